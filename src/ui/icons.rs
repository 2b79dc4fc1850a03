pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const PERSON: &str = "👤";
    pub const PHONE: &str = "📱";
    pub const POLICY: &str = "📄";
    pub const CARD: &str = "💳";
    pub const MONEY: &str = "💰";
    pub const CALENDAR: &str = "📅";
    pub const BELL: &str = "🔔";
    pub const DATABASE: &str = "🗄️";
    pub const STATS: &str = "📊";
    pub const SAVE: &str = "💾";
    pub const IMPORT: &str = "📥";
    pub const EXPORT: &str = "📤";
    pub const SEARCH: &str = "🔍";
    pub const DEL: &str = "🗑️";
}
