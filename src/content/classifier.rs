use crate::domain::{FieldCategory, FieldDescriptor, KEYWORD_TABLE};

/// Maps a field to a profile category by keyword containment.
///
/// The keyword table is walked in declaration order and the first category
/// with a matching keyword wins. A few looser word pairs are tried afterwards.
pub fn classify(descriptor: &FieldDescriptor) -> Option<FieldCategory> {
    classify_text(&descriptor.search_text())
}

pub fn classify_text(text: &str) -> Option<FieldCategory> {
    for (category, keywords) in KEYWORD_TABLE {
        if keywords.iter().any(|keyword| text.contains(keyword)) {
            return Some(*category);
        }
    }

    if text.contains("first") && text.contains("name") {
        return Some(FieldCategory::FirstName);
    }
    if text.contains("last") && text.contains("name") {
        return Some(FieldCategory::LastName);
    }
    if text.contains('@') || text.contains("email") {
        return Some(FieldCategory::Email);
    }
    if text.contains("phone") || text.contains("mobile") {
        return Some(FieldCategory::Phone);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;

    fn named(name: &str) -> FieldDescriptor {
        let mut descriptor = FieldDescriptor::new(FieldKind::TextLike);
        descriptor.name = Some(name.to_string());
        descriptor
    }

    #[test]
    fn matches_table_keywords() {
        assert_eq!(classify(&named("first-name")), Some(FieldCategory::FirstName));
        assert_eq!(classify(&named("surname")), Some(FieldCategory::LastName));
        assert_eq!(classify(&named("zip")), Some(FieldCategory::ZipCode));
        assert_eq!(classify(&named("linkedin-url")), Some(FieldCategory::Linkedin));
        assert_eq!(classify(&named("grad-year")), Some(FieldCategory::GraduationYear));
    }

    #[test]
    fn earlier_category_wins_on_overlap() {
        // "email-address" also contains the address keyword
        assert_eq!(classify(&named("email-address")), Some(FieldCategory::Email));
        // "company-name" hits fullName through "name" before currentCompany
        assert_eq!(classify(&named("company-name")), Some(FieldCategory::FullName));
    }

    #[test]
    fn uses_all_identifier_attributes() {
        let mut descriptor = FieldDescriptor::new(FieldKind::TextLike);
        descriptor.aria_label = Some("Your City".into());
        assert_eq!(classify(&descriptor), Some(FieldCategory::City));

        let mut descriptor = FieldDescriptor::new(FieldKind::TextLike);
        descriptor.test_id = Some("applicant-employer".into());
        assert_eq!(classify(&descriptor), Some(FieldCategory::CurrentCompany));
    }

    #[test]
    fn fallback_pairs_apply_after_table() {
        assert_eq!(classify_text("you@example"), Some(FieldCategory::Email));
        assert_eq!(classify_text("first given"), None);
    }

    #[test]
    fn unknown_text_is_unclassified() {
        assert_eq!(classify(&named("favourite-colour")), None);
        assert_eq!(classify(&FieldDescriptor::new(FieldKind::TextLike)), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let descriptor = named("contact-number");
        let first = classify(&descriptor);
        for _ in 0..10 {
            assert_eq!(classify(&descriptor), first);
        }
        assert_eq!(first, Some(FieldCategory::Phone));
    }
}
