use std::str::FromStr;

use ethers::prelude::Lazy;
use ethers::types::Address;

pub static ZERO_ADDRESS: Lazy<Address> =
    Lazy::new(|| Address::from_str("0x0000000000000000000000000000000000000000").unwrap());

/// SKALE predeployed system contracts. Their native balances are chain plumbing, not player funds.
pub static SKALE_SYSTEM_ACCOUNTS: Lazy<Vec<Address>> = Lazy::new(|| {
    [
        // Etherbase
        "0xd2bA3e0000000000000000000000000000000000",
        // Marionette
        "0xD2c0DeFACe000000000000000000000000000000",
        // ConfigController
        "0xD2002000000000000000000000000000000000D2",
        // FileStorage
        "0xD3002000000000000000000000000000000000d3",
        // MessageProxyForSchain
        "0xd2AAa00100000000000000000000000000000000",
        // KeyStorage
        "0xd2aaa00200000000000000000000000000000000",
        // CommunityLocker
        "0xD2aaa00300000000000000000000000000000000",
        // TokenManagerEth
        "0xd2AaA00400000000000000000000000000000000",
        // TokenManagerERC20
        "0xD2aAA00500000000000000000000000000000000",
        // TokenManagerERC721
        "0xD2aaa00600000000000000000000000000000000",
        // EthErc20
        "0xD2Aaa00700000000000000000000000000000000",
        // TokenManagerLinker
        "0xD2aAA00800000000000000000000000000000000",
        // TokenManagerERC1155
        "0xD2aaA00900000000000000000000000000000000",
        // TokenManagerERC721WithMetadata
        "0xd2AaA00a00000000000000000000000000000000",
    ]
    .iter()
    .map(|address| Address::from_str(address).unwrap())
    .collect()
});
