/// Display metadata for a tracked coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinInfo {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub rank: Option<u32>,
}

struct KnownCoin {
    id: &'static str,
    name: &'static str,
    symbol: &'static str,
    description: &'static str,
    rank: u32,
}

const KNOWN_COINS: &[KnownCoin] = &[
    KnownCoin {
        id: "bitcoin",
        name: "Bitcoin",
        symbol: "BTC",
        description: "First decentralized cryptocurrency",
        rank: 1,
    },
    KnownCoin {
        id: "ethereum",
        name: "Ethereum",
        symbol: "ETH",
        description: "Blockchain with smart contracts",
        rank: 2,
    },
    KnownCoin {
        id: "solana",
        name: "Solana",
        symbol: "SOL",
        description: "High-performance blockchain",
        rank: 5,
    },
    KnownCoin {
        id: "cardano",
        name: "Cardano",
        symbol: "ADA",
        description: "Proof-of-stake blockchain",
        rank: 8,
    },
    KnownCoin {
        id: "dogecoin",
        name: "Dogecoin",
        symbol: "DOGE",
        description: "Meme-based cryptocurrency",
        rank: 10,
    },
];

const FALLBACK_SYMBOL_LEN: usize = 4;

/// Look up a coin id. Unknown ids get a capitalised name, a symbol made
/// from the first letters of the id, and no rank.
pub fn coin_info(id: &str) -> CoinInfo {
    let id = id.trim().to_ascii_lowercase();
    if let Some(known) = KNOWN_COINS.iter().find(|c| c.id == id) {
        return CoinInfo {
            id,
            name: known.name.to_string(),
            symbol: known.symbol.to_string(),
            description: known.description.to_string(),
            rank: Some(known.rank),
        };
    }
    CoinInfo {
        name: display_name(&id),
        symbol: id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(FALLBACK_SYMBOL_LEN)
            .collect::<String>()
            .to_ascii_uppercase(),
        description: "Cryptocurrency".to_string(),
        rank: None,
        id,
    }
}

/// "bitcoin" -> "Bitcoin", "usd-coin" -> "Usd-coin".
pub fn display_name(id: &str) -> String {
    if let Some(known) = KNOWN_COINS.iter().find(|c| c.id == id) {
        return known.name.to_string();
    }
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl CoinInfo {
    pub fn rank_label(&self) -> String {
        match self.rank {
            Some(rank) => format!("#{}", rank),
            None => "#N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_coin_has_rank_and_symbol() {
        let info = coin_info("ethereum");
        assert_eq!(info.symbol, "ETH");
        assert_eq!(info.rank, Some(2));
        assert_eq!(info.rank_label(), "#2");
    }

    #[test]
    fn unknown_coin_falls_back() {
        let info = coin_info("polkadot");
        assert_eq!(info.name, "Polkadot");
        assert_eq!(info.symbol, "POLK");
        assert_eq!(info.description, "Cryptocurrency");
        assert_eq!(info.rank, None);
        assert_eq!(info.rank_label(), "#N/A");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(coin_info("  Bitcoin ").symbol, "BTC");
    }
}
