use sha2::{Digest, Sha256};

/// Highest random weight hashing over a fixed set of participants.
///
/// Every participant is scored against a lookup key with
/// `SHA-256(participant || key)`, reading the first 8 digest bytes as a
/// big-endian `u64`. Participants are ordered by descending score and ties
/// fall back to construction order, so the ordering is identical on every
/// machine. Changing the weight function changes placement for every key and
/// must be treated as a breaking change.
///
/// Duplicate participants are kept and scored as separate candidates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RendezvousHash {
    participants: Vec<String>,
}

impl RendezvousHash {
    pub fn new<I, S>(participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Weight of `participant` for `key`.
    pub fn score(participant: &str, key: &str) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(participant.as_bytes());
        hasher.update(key.as_bytes());
        let digest = hasher.finalize();

        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(prefix)
    }

    /// Indices of all participants, highest weight first.
    pub fn rank(&self, key: &str) -> Vec<usize> {
        let mut scored: Vec<(u64, usize)> = self
            .participants
            .iter()
            .enumerate()
            .map(|(idx, participant)| (Self::score(participant, key), idx))
            .collect();

        // Stable sort keeps construction order among equal scores.
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, idx)| idx).collect()
    }

    /// The `n` highest weighted participants for `key`. `n` is clamped to the
    /// number of participants.
    pub fn get_n(&self, n: usize, key: &str) -> Vec<&str> {
        self.rank(key)
            .into_iter()
            .take(n)
            .map(|idx| self.participants[idx].as_str())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_n(1, key).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn wallets() -> RendezvousHash {
        RendezvousHash::new(["wallet1", "wallet2", "wallet3"])
    }

    #[test]
    fn test_score_is_pinned() {
        assert_eq!(
            RendezvousHash::score("wallet1", "test-rendezvous-key"),
            0xa7a9_8a43_7a8b_884b
        );
        assert_eq!(
            RendezvousHash::score("wallet3", "test-rendezvous-key"),
            0xf89d_74f7_dff2_4853
        );
    }

    #[test]
    fn test_get_n_orders_by_descending_score() {
        let hash = wallets();
        assert_eq!(
            hash.get_n(3, "test-rendezvous-key"),
            vec!["wallet3", "wallet1", "wallet2"]
        );

        let hash = RendezvousHash::new(["wallet1", "wallet2", "wallet3", "wallet4"]);
        assert_eq!(
            hash.get_n(4, "QmYSXzYYWFavq6bnhCcnHSyCfwu5WfWeDRaM1RGYmhn8Np"),
            vec!["wallet1", "wallet2", "wallet3", "wallet4"]
        );
    }

    #[test]
    fn test_get_n_empty_key() {
        assert_eq!(wallets().get_n(3, ""), vec!["wallet2", "wallet1", "wallet3"]);
    }

    #[test]
    fn test_get_n_clamps_and_handles_zero() {
        let hash = wallets();
        assert!(hash.get_n(0, "test-rendezvous-key").is_empty());
        assert_eq!(hash.get_n(10, "test-rendezvous-key").len(), 3);
        assert_eq!(hash.get_n(1, "test-rendezvous-key"), vec!["wallet3"]);
        assert!(RendezvousHash::default().get_n(5, "key").is_empty());
    }

    #[test]
    fn test_get_returns_top_participant() {
        assert_eq!(wallets().get("test-rendezvous-key"), Some("wallet3"));
        assert_eq!(RendezvousHash::default().get("key"), None);
    }

    #[test]
    fn test_order_does_not_depend_on_construction_order() {
        let forward = wallets();
        let reversed = RendezvousHash::new(["wallet3", "wallet2", "wallet1"]);
        for key in ["", "a", "test-rendezvous-key", "QmHash", "0xabc"] {
            assert_eq!(forward.get_n(3, key), reversed.get_n(3, key));
        }
    }

    #[test]
    fn test_duplicates_are_kept_in_construction_order() {
        let hash = RendezvousHash::new(["wallet1", "wallet1", "wallet2"]);
        assert_eq!(hash.len(), 3);
        // Equal scores resolve by index, so the two copies stay adjacent and in order.
        let ranked = hash.rank("test-rendezvous-key");
        let first = ranked.iter().position(|&idx| idx == 0).unwrap();
        assert_eq!(ranked[first + 1], 1);
    }

    #[test]
    fn test_minimal_disruption_on_remove_and_add() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let size = rng.random_range(2..16);
            let participants: Vec<String> = (0..size)
                .map(|_| format!("0x{:040x}", rng.random::<u128>()))
                .collect();
            let key = format!("Qm{:032x}", rng.random::<u128>());

            let full = RendezvousHash::new(participants.clone());
            let before = full.get_n(size, &key);

            let mut remaining = participants.clone();
            remaining.shuffle(&mut rng);
            let removed = remaining.pop().unwrap();
            let shrunk = RendezvousHash::new(remaining);
            let after = shrunk.get_n(size, &key);

            let expected: Vec<&str> = before
                .iter()
                .copied()
                .filter(|participant| *participant != removed.as_str())
                .collect();
            assert_eq!(after, expected);

            let added = format!("0x{:040x}", rng.random::<u128>());
            let mut grown = participants.clone();
            grown.push(added.clone());
            let grown = RendezvousHash::new(grown);
            let with_new = grown.get_n(size + 1, &key);
            let without_new: Vec<&str> = with_new
                .iter()
                .copied()
                .filter(|participant| *participant != added.as_str())
                .collect();
            assert_eq!(without_new, before);
        }
    }

    #[test]
    fn test_keys_spread_across_participants() {
        let hash = RendezvousHash::new((0..4).map(|i| format!("wallet{i}")));
        let mut wins = [0usize; 4];
        for i in 0..4000 {
            let top = hash.rank(&format!("cid-{i}"))[0];
            wins[top] += 1;
        }
        for count in wins {
            assert!(count > 700, "uneven distribution: {wins:?}");
        }
    }
}
