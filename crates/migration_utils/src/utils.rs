use std::fmt::LowerHex;

use ethers::signers::{LocalWallet, Signer, WalletError};

pub fn format_lower_hex(hash: &impl LowerHex) -> String {
    format!("{:#x}", hash)
}

/// Wallet for a hex private key, with or without `0x` prefix
pub fn load_private_key_wallet(private_key: &str, chain_id: u64) -> Result<LocalWallet, WalletError> {
    let wallet = private_key
        .trim()
        .trim_start_matches("0x")
        .parse::<LocalWallet>()?;
    Ok(wallet.with_chain_id(chain_id))
}
