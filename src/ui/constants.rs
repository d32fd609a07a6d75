// ui/constants.rs

pub const TITLE: &str = r#" __  __             _        _____     _
|  \/  | __ _  __ _(_) ___  |_   _|_ _| | ___  ___
| |\/| |/ _` |/ _` | |/ __|   | |/ _` | |/ _ \/ __|
| |  | | (_| | (_| | | (__    | | (_| | |  __/\__ \
|_|  |_|\__,_|\__, |_|\___|   |_|\__,_|_|\___||___/
              |___/
"#;

pub const CATALOG_KEYS: &str = "↑↓ select · Enter chat · n new story · q quit";
pub const CHAT_KEYS: &str = "Enter send · PgUp/PgDn scroll · Esc back";
pub const THEME_KEYS: &str = "Enter conjure · Tab review or write your own · Esc back";
pub const REVIEW_KEYS: &str =
    "↑↓ select · Enter edit · a accept · r regenerate · e story elements · t theme · Esc back";
pub const EDIT_KEYS: &str = "Enter save · Esc cancel";
