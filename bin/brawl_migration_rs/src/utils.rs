use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::anyhow;
use ethers::types::{Address, U256};

/// Comma separated addresses, blanks ignored
pub fn parse_address_list(value: &str) -> anyhow::Result<Vec<Address>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(|address| {
            Address::from_str(address).map_err(|err| anyhow!("invalid address {:?}: {}", address, err))
        })
        .collect()
}

/// Base-10 amount. `U256::from_str` reads hex, which is never what an operator means here.
pub fn parse_dec_u256(value: &str) -> anyhow::Result<U256> {
    let value = value.trim().replace('_', "");
    if value.is_empty() {
        return Err(anyhow!("empty amount"));
    }
    U256::from_dec_str(&value).map_err(|err| anyhow!("invalid amount {:?}: {}", value, err))
}

/// `snapshots/brawl-snapshot-7461153.json` -> `snapshots/brawl-snapshot-7461153.brawl-ledger.json`
pub fn ledger_path_for(snapshot_path: &Path, kind: &str) -> PathBuf {
    snapshot_path.with_extension(format!("{}-ledger.json", kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_address_lists() {
        let addresses = parse_address_list(
            "0x0000000000000000000000000000000000000001, ,0xd2aaa00100000000000000000000000000000000,",
        )
        .unwrap();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0], Address::from_low_u64_be(1));
        assert!(parse_address_list("").unwrap().is_empty());
        assert!(parse_address_list("0x1234").is_err());
    }

    #[test]
    fn amounts_are_decimal() {
        assert_eq!(parse_dec_u256("10").unwrap(), U256::from(10));
        assert_eq!(
            parse_dec_u256("1_000_000_000_000_000_000_000").unwrap(),
            U256::exp10(21)
        );
        assert!(parse_dec_u256("0x10").is_err());
        assert!(parse_dec_u256(" ").is_err());
    }

    #[test]
    fn ledger_sits_next_to_snapshot() {
        assert_eq!(
            ledger_path_for(Path::new("snapshots/nft-snapshot-7460737.json"), "heroes"),
            PathBuf::from("snapshots/nft-snapshot-7460737.heroes-ledger.json")
        );
    }
}
