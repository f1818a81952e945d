use anyhow::{bail, Context, Result};
use storage::StorageNode;
use url::Url;

/// Reads a JSON array of storage nodes as published by the service provider
/// registry.
pub fn load_nodes(path: &str) -> Result<Vec<StorageNode>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read nodes file: {path}"))?;
    parse_nodes(&content).with_context(|| format!("Invalid nodes file: {path}"))
}

pub fn parse_nodes(content: &str) -> Result<Vec<StorageNode>> {
    let nodes: Vec<StorageNode> =
        serde_json::from_str(content).context("Failed to parse storage nodes")?;

    for node in &nodes {
        let url = Url::parse(&node.endpoint)
            .with_context(|| format!("Invalid endpoint: {}", node.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Unsupported endpoint scheme: {}", node.endpoint);
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodes() -> Result<()> {
        let nodes = parse_nodes(
            r#"[
                {"endpoint": "http://node1.com", "delegateOwnerWallet": "wallet1", "spID": 1},
                {"endpoint": "https://node2.com/", "delegateOwnerWallet": "wallet2", "type": "content-node"}
            ]"#,
        )?;

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].delegate_owner_wallet, "wallet1");
        assert_eq!(nodes[1].status_url(), "https://node2.com/status");
        Ok(())
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let err = parse_nodes(r#"[{"endpoint": "node1", "delegateOwnerWallet": "wallet1"}]"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Invalid endpoint: node1"));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        assert!(parse_nodes(
            r#"[{"endpoint": "ftp://node1.com", "delegateOwnerWallet": "wallet1"}]"#
        )
        .is_err());
    }

    #[test]
    fn test_rejects_missing_wallet_field() {
        assert!(parse_nodes(r#"[{"endpoint": "http://node1.com"}]"#).is_err());
    }
}
