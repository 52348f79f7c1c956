/// Categories of the Open Finance Brasil API families, in match order.
/// Entries containing a shorter entry are listed ahead of it.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "consents",
    "resources",
    "customers",
    "credit-cards-accounts",
    "unarranged-accounts-overdraft",
    "accounts",
    "loans",
    "invoice-financings",
    "financings",
    "bank-fixed-incomes",
    "credit-fixed-incomes",
    "variable-incomes",
    "treasure-titles",
    "funds",
    "exchanges",
    "acquiring-services",
    "automatic-payments",
    "capitalization-title",
    "pension",
];

/// Options that control how contracts are discovered and classified.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Known category names matched against file paths and titles.
    pub categories: Vec<String>,
    /// File extensions (without dot, lowercase) picked up by directory scans.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            extensions: ["json", "yaml", "yml"].iter().map(|s| s.to_string()).collect(),
            skip_dirs: [".git", ".hg", ".svn", "node_modules"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ParseOptions {
    pub fn accepts_extension(&self, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        self.extensions.iter().any(|item| *item == extension)
    }

    pub fn skips_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|item| item == name)
    }
}
