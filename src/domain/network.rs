/// EVM networks an `exact` payment can be signed for.
const CHAIN_IDS: &[(&str, u64)] = &[
    ("base", 8453),
    ("base-sepolia", 84532),
    ("avalanche", 43114),
    ("avalanche-fuji", 43113),
    ("iotex", 4689),
    ("sei", 1329),
    ("sei-testnet", 1328),
    ("polygon", 137),
    ("polygon-amoy", 80002),
    ("peaq", 3338),
];

pub fn chain_id(network: &str) -> Option<u64> {
    CHAIN_IDS
        .iter()
        .find(|(name, _)| *name == network)
        .map(|(_, id)| *id)
}

pub fn supported_networks() -> impl Iterator<Item = &'static str> {
    CHAIN_IDS.iter().map(|(name, _)| *name)
}
