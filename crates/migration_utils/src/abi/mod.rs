use ethers::contract::abigen;

abigen!(BlockBrawlersErc721Abigen, "src/abi/BlockBrawlersERC721.json");
abigen!(BrawlTokenNebulaAbigen, "src/abi/BrawlTokenNebula.json");
abigen!(BrawlHeroesAbigen, "src/abi/BrawlHeroes.json");

/// Raw ABI of the source collection, embedded into NFT snapshots
pub const BLOCK_BRAWLERS_ERC721_ABI_JSON: &str = include_str!("BlockBrawlersERC721.json");

pub fn block_brawlers_erc721_abi() -> serde_json::Result<serde_json::Value> {
    serde_json::from_str(BLOCK_BRAWLERS_ERC721_ABI_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_abi_is_a_function_list() {
        let abi = block_brawlers_erc721_abi().unwrap();
        let names: Vec<&str> = abi
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|item| item["name"].as_str())
            .collect();
        assert!(names.contains(&"totalSupply"));
        assert!(names.contains(&"ownerOf"));
        assert!(names.contains(&"getHero"));
    }
}
