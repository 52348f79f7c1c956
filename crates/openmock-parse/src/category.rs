use openmock_core::UNKNOWN_CATEGORY;

/// Infer a contract's category from its file path and title.
///
/// Vocabulary entries are tried in order, each as a case-insensitive
/// substring of the path or the title; the first hit wins. Entries that
/// contain another entry (`credit-cards-accounts` contains `accounts`) must
/// come before it.
pub fn infer_category(categories: &[String], path: &str, title: &str) -> String {
    let path = path.to_lowercase();
    let title = title.to_lowercase();

    categories
        .iter()
        .find(|category| {
            let category = category.to_lowercase();
            path.contains(&category) || title.contains(&category)
        })
        .cloned()
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;

    fn vocabulary() -> Vec<String> {
        ParseOptions::default().categories
    }

    #[test]
    fn matches_path_case_insensitively() {
        let category = infer_category(&vocabulary(), "specs/Consents/swagger.yaml", "API");
        assert_eq!(category, "consents");
    }

    #[test]
    fn matches_title_when_path_is_generic() {
        let category = infer_category(&vocabulary(), "specs/v2/openapi.json", "Loans API");
        assert_eq!(category, "loans");
    }

    #[test]
    fn specific_entries_shadow_their_substrings() {
        let category = infer_category(
            &vocabulary(),
            "specs/credit-cards-accounts/openapi.yaml",
            "API Credit Cards Accounts",
        );
        assert_eq!(category, "credit-cards-accounts");
    }

    #[test]
    fn vocabulary_order_decides_between_path_and_title() {
        let category = infer_category(
            &vocabulary(),
            "specs/consents/openapi.yaml",
            "API Consents and Resources",
        );
        assert_eq!(category, "consents");

        let category = infer_category(&vocabulary(), "specs/resources/openapi.yaml", "Consents");
        assert_eq!(category, "consents");
    }

    #[test]
    fn overdraft_and_invoice_entries_win_over_shorter_ones() {
        let category = infer_category(
            &vocabulary(),
            "specs/unarranged-accounts-overdraft/openapi.yaml",
            "API",
        );
        assert_eq!(category, "unarranged-accounts-overdraft");

        let category = infer_category(&vocabulary(), "specs/invoice-financings.yaml", "API");
        assert_eq!(category, "invoice-financings");
    }

    #[test]
    fn falls_back_to_unknown() {
        let category = infer_category(&vocabulary(), "specs/payments.json", "Pix");
        assert_eq!(category, UNKNOWN_CATEGORY);
    }
}
