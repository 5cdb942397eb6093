//! Hand-curated listing data for Binance USDT-margined perpetuals.
//!
//! Binance futures opened with 3 markets in 2019 and had ~80 by the end of
//! 2020. Until the listing universe caught up with the market-cap rankings,
//! querying by rank mostly produced symbols that could not have existed yet,
//! so each year up to the threshold gets a fixed list compiled from Binance
//! listing announcements instead.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Snapshot symbols never tracked: fiat-pegged assets have no meaningful funding.
pub const STABLECOINS: &[&str] = &[
    "BUSD", "BITEUR", "BITUSD", "DAI", "EURS", "HUSD", "LUSD", "PAX", "RAI", "TUSD", "USDC",
    "USDD", "USDN", "USDP", "USDT", "UST", "USTC", "VAI", "XUSD",
];

/// Assets Binance lists per 1000 units, e.g. SHIB trades as 1000SHIBUSDT.
pub const DENOMINATION_PREFIX: &str = "1000";
pub const PREFIXED_ASSETS: &[&str] = &["BONK", "FLOKI", "LUNC", "PEPE", "RATS", "SATS", "SHIB"];

/// (exchange ticker, snapshot symbol) pairs naming the same asset differently.
pub const ALIASES: &[(&str, &str)] = &[("IOTA", "MIOTA")];

const BEFORE_2020: &[&str] = &["BTC", "ETH", "BCH"];

const BEFORE_2021: &[&str] = &[
    "BTC", "ETH", "BCH", "XRP", "LTC", "BNB", "LINK", "ADA", "DOT", "XLM",
    "XMR", "EOS", "TRX", "XTZ", "THETA", "NEO", "DASH", "VET", "ATOM", "FIL",
    "UNI", "AAVE", "SNX", "ZIL", "IOTA", "ZEC", "YFI", "WAVES", "ETC", "DOGE",
    "COMP", "MKR", "GRT", "SUSHI", "KSM", "ALGO", "OMG", "ONT", "EGLD", "BAT",
    "ZRX", "REN", "NEAR", "ICX", "QTUM", "AVAX", "REP", "RSR", "KNC", "RUNE",
    "OCEAN", "ZEN", "CHZ", "BNT", "ENJ", "BAND", "BAL", "IOST", "MATIC", "HNT",
    "CRV", "STORJ", "RLC", "SOL", "KAVA", "CVC", "SXP", "SRM", "YFII", "TOMO",
    "FTM", "ALPHA", "AXS", "LEND", "UNFI", "SKL", "BEL", "CTK", "FLM", "BLZ",
    "BZRX",
];

const BEFORE_2022: &[&str] = &[
    "BTC", "ETH", "BCH", "XRP", "LTC", "BNB", "LINK", "ADA", "DOT", "XLM",
    "XMR", "EOS", "TRX", "XTZ", "THETA", "NEO", "DASH", "VET", "ATOM", "FIL",
    "UNI", "AAVE", "SNX", "ZIL", "IOTA", "ZEC", "YFI", "WAVES", "ETC", "DOGE",
    "COMP", "MKR", "GRT", "SUSHI", "KSM", "ALGO", "OMG", "ONT", "EGLD", "BAT",
    "ZRX", "REN", "NEAR", "ICX", "QTUM", "AVAX", "REP", "RSR", "KNC", "RUNE",
    "OCEAN", "ZEN", "CHZ", "BNT", "ENJ", "BAND", "BAL", "IOST", "MATIC", "HNT",
    "CRV", "STORJ", "RLC", "SOL", "KAVA", "CVC", "SXP", "SRM", "YFII", "TOMO",
    "FTM", "ALPHA", "AXS", "LEND", "UNFI", "SKL", "BEL", "CTK", "FLM", "BLZ",
    "BZRX", "AKRO", "SAND", "ANKR", "REEF", "RVN", "SFP", "DODO", "LIT", "LUNA",
    "COTI", "XEM", "1INCH", "CELR", "HOT", "DENT", "STMX", "LINA", "ONE", "ALICE",
    "CHR", "MANA", "HBAR", "DGB", "NKN", "SC", "BTT", "OGN", "MTL", "BAKE",
    "ICP", "1000SHIB", "GALA", "KLAY", "CELO", "AR", "CTSI", "ARPA", "NU", "LPT",
    "ENS", "PEOPLE", "ANT", "ROSE",
];

const BEFORE_2023: &[&str] = &[
    "BTC", "ETH", "BCH", "XRP", "LTC", "BNB", "LINK", "ADA", "DOT", "XLM",
    "XMR", "EOS", "TRX", "XTZ", "THETA", "NEO", "DASH", "VET", "ATOM", "FIL",
    "UNI", "AAVE", "SNX", "ZIL", "IOTA", "ZEC", "YFI", "WAVES", "ETC", "DOGE",
    "COMP", "MKR", "GRT", "SUSHI", "KSM", "ALGO", "OMG", "ONT", "EGLD", "BAT",
    "ZRX", "REN", "NEAR", "ICX", "QTUM", "AVAX", "REP", "RSR", "KNC", "RUNE",
    "OCEAN", "ZEN", "CHZ", "BNT", "ENJ", "BAND", "BAL", "IOST", "MATIC", "HNT",
    "CRV", "STORJ", "RLC", "SOL", "KAVA", "CVC", "SXP", "SRM", "YFII", "TOMO",
    "FTM", "ALPHA", "AXS", "LEND", "UNFI", "SKL", "BEL", "CTK", "FLM", "BLZ",
    "BZRX", "AKRO", "SAND", "ANKR", "REEF", "RVN", "SFP", "DODO", "LIT", "LUNA",
    "COTI", "XEM", "1INCH", "CELR", "HOT", "DENT", "STMX", "LINA", "ONE", "ALICE",
    "CHR", "MANA", "HBAR", "DGB", "NKN", "SC", "BTT", "OGN", "MTL", "BAKE",
    "ICP", "1000SHIB", "GALA", "KLAY", "CELO", "AR", "CTSI", "ARPA", "NU", "LPT",
    "ENS", "PEOPLE", "ANT", "ROSE", "DUSK", "ANC", "API3", "IMX", "FLOW", "WOO",
    "BNX", "APE", "GMT", "GAL", "DAR", "JASMY", "OP", "INJ", "CVX", "LDO",
    "PHB", "AMB", "LUNA2", "1000LUNC", "SPELL", "STG", "APT", "QNT", "FTT",
];

const BEFORE_2024: &[&str] = &[
    "BTC", "ETH", "BCH", "XRP", "LTC", "BNB", "LINK", "ADA", "DOT", "XLM",
    "XMR", "EOS", "TRX", "XTZ", "THETA", "NEO", "DASH", "VET", "ATOM", "FIL",
    "UNI", "AAVE", "SNX", "ZIL", "IOTA", "ZEC", "YFI", "WAVES", "ETC", "DOGE",
    "COMP", "MKR", "GRT", "SUSHI", "KSM", "ALGO", "OMG", "ONT", "EGLD", "BAT",
    "ZRX", "REN", "NEAR", "ICX", "QTUM", "AVAX", "REP", "RSR", "KNC", "RUNE",
    "OCEAN", "ZEN", "CHZ", "BNT", "ENJ", "BAND", "BAL", "IOST", "MATIC", "HNT",
    "CRV", "STORJ", "RLC", "SOL", "KAVA", "CVC", "SXP", "SRM", "YFII", "TOMO",
    "FTM", "ALPHA", "AXS", "LEND", "UNFI", "SKL", "BEL", "CTK", "FLM", "BLZ",
    "BZRX", "AKRO", "SAND", "ANKR", "REEF", "RVN", "SFP", "DODO", "LIT", "LUNA",
    "COTI", "XEM", "1INCH", "CELR", "HOT", "DENT", "STMX", "LINA", "ONE", "ALICE",
    "CHR", "MANA", "HBAR", "DGB", "NKN", "SC", "BTT", "OGN", "MTL", "BAKE",
    "ICP", "1000SHIB", "GALA", "KLAY", "CELO", "AR", "CTSI", "ARPA", "NU", "LPT",
    "ENS", "PEOPLE", "ANT", "ROSE", "DUSK", "ANC", "API3", "IMX", "FLOW", "WOO",
    "BNX", "APE", "GMT", "GAL", "DAR", "JASMY", "OP", "INJ", "CVX", "LDO",
    "PHB", "AMB", "LUNA2", "1000LUNC", "SPELL", "STG", "APT", "QNT", "FTT", "FET",
    "FXS", "HOOK", "MAGIC", "T", "RNDR", "MINA", "HIGH", "ASTR", "AGIX", "GMX",
    "CFX", "STX", "COCOS", "ACH", "SSV", "CKB", "PERP", "TRU", "LQTY", "ARB",
    "ID", "JOE", "LEVER", "TLM", "RDNT", "HFT", "XVS", "BLUR", "EDU", "IDEX",
    "SUI", "1000PEPE", "1000FLOKI", "RAD", "UMA", "KEY", "COMBO", "NMR", "MAV", "MDT",
    "XVG", "WLD", "PENDLE", "ARKM", "AGLD", "YGG", "OXT", "SEI", "CYBER", "HIFI",
    "ARK", "FRONT", "GLMR", "BICO", "STRAX", "LOOM", "BIGTIME", "BOND", "ORBS", "STPT",
    "WAXP", "BSV", "RIF", "POLYX", "GAS", "POWR", "SLP", "TIA", "SNT", "CAKE",
    "TWT", "MEME", "TOKEN", "ORDI", "STEEM", "BADGER", "ILV", "NTRN", "MBL", "KAS",
    "BEAMX", "1000BONK", "PYTH", "SUPER", "USTC", "USDC", "ONG", "ETHW", "JTO", "1000SATS",
    "AUCTION", "1000RATS", "ACE",
];

/// Era lists keyed by the first date they no longer apply to.
pub static ERAS: LazyLock<BTreeMap<NaiveDate, &'static [&'static str]>> = LazyLock::new(|| {
    [
        ((2020, 1, 1), BEFORE_2020),
        ((2021, 1, 1), BEFORE_2021),
        ((2022, 1, 1), BEFORE_2022),
        ((2023, 1, 1), BEFORE_2023),
        ((2024, 1, 1), BEFORE_2024),
    ]
    .into_iter()
    .filter_map(|((y, m, d), symbols)| Some((NaiveDate::from_ymd_opt(y, m, d)?, symbols)))
    .collect()
});

