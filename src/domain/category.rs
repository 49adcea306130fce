use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile field a page input can be mapped to.
///
/// Variant order is significant: it is the precedence order used by the
/// classifier and the key order of exported profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldCategory {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    Address,
    City,
    State,
    ZipCode,
    Country,
    CurrentTitle,
    CurrentCompany,
    Experience,
    University,
    Degree,
    Major,
    GraduationYear,
    Linkedin,
    Portfolio,
    CoverLetter,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 20] = [
        FieldCategory::FirstName,
        FieldCategory::LastName,
        FieldCategory::FullName,
        FieldCategory::Email,
        FieldCategory::Phone,
        FieldCategory::Address,
        FieldCategory::City,
        FieldCategory::State,
        FieldCategory::ZipCode,
        FieldCategory::Country,
        FieldCategory::CurrentTitle,
        FieldCategory::CurrentCompany,
        FieldCategory::Experience,
        FieldCategory::University,
        FieldCategory::Degree,
        FieldCategory::Major,
        FieldCategory::GraduationYear,
        FieldCategory::Linkedin,
        FieldCategory::Portfolio,
        FieldCategory::CoverLetter,
    ];

    /// Storage and wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::FirstName => "firstName",
            FieldCategory::LastName => "lastName",
            FieldCategory::FullName => "fullName",
            FieldCategory::Email => "email",
            FieldCategory::Phone => "phone",
            FieldCategory::Address => "address",
            FieldCategory::City => "city",
            FieldCategory::State => "state",
            FieldCategory::ZipCode => "zipCode",
            FieldCategory::Country => "country",
            FieldCategory::CurrentTitle => "currentTitle",
            FieldCategory::CurrentCompany => "currentCompany",
            FieldCategory::Experience => "experience",
            FieldCategory::University => "university",
            FieldCategory::Degree => "degree",
            FieldCategory::Major => "major",
            FieldCategory::GraduationYear => "graduationYear",
            FieldCategory::Linkedin => "linkedin",
            FieldCategory::Portfolio => "portfolio",
            FieldCategory::CoverLetter => "coverLetter",
        }
    }

    /// Human readable label shown next to detected fields.
    pub fn label(&self) -> &'static str {
        match self {
            FieldCategory::FirstName => "First Name",
            FieldCategory::LastName => "Last Name",
            FieldCategory::FullName => "Full Name",
            FieldCategory::Email => "Email",
            FieldCategory::Phone => "Phone",
            FieldCategory::Address => "Address",
            FieldCategory::City => "City",
            FieldCategory::State => "State",
            FieldCategory::ZipCode => "Zip Code",
            FieldCategory::Country => "Country",
            FieldCategory::CurrentTitle => "Job Title",
            FieldCategory::CurrentCompany => "Company",
            FieldCategory::Experience => "Experience",
            FieldCategory::University => "University",
            FieldCategory::Degree => "Degree",
            FieldCategory::Major => "Major",
            FieldCategory::GraduationYear => "Graduation Year",
            FieldCategory::Linkedin => "LinkedIn",
            FieldCategory::Portfolio => "Portfolio",
            FieldCategory::CoverLetter => "Cover Letter",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown profile field: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for FieldCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Keywords per category, searched in this order.
pub const KEYWORD_TABLE: &[(FieldCategory, &[&str])] = &[
    (
        FieldCategory::FirstName,
        &["first-name", "fname", "firstname", "given-name", "forename"],
    ),
    (
        FieldCategory::LastName,
        &["last-name", "lname", "lastname", "family-name", "surname"],
    ),
    (
        FieldCategory::FullName,
        &["full-name", "name", "fullname", "complete-name", "applicant-name"],
    ),
    (
        FieldCategory::Email,
        &["email", "e-mail", "email-address", "mail", "contact-email"],
    ),
    (
        FieldCategory::Phone,
        &["phone", "telephone", "mobile", "contact-number", "phone-number"],
    ),
    (
        FieldCategory::Address,
        &["address", "street-address", "location", "residential-address"],
    ),
    (FieldCategory::City, &["city", "town", "locality"]),
    (FieldCategory::State, &["state", "province", "region"]),
    (
        FieldCategory::ZipCode,
        &["zip", "postal-code", "postcode", "zip-code"],
    ),
    (FieldCategory::Country, &["country", "nation"]),
    (
        FieldCategory::CurrentTitle,
        &["current-title", "job-title", "position", "current-position", "title"],
    ),
    (
        FieldCategory::CurrentCompany,
        &[
            "current-company",
            "company",
            "employer",
            "current-employer",
            "organization",
        ],
    ),
    (
        FieldCategory::Experience,
        &[
            "experience",
            "years-experience",
            "work-experience",
            "total-experience",
        ],
    ),
    (
        FieldCategory::University,
        &["university", "college", "school", "education", "alma-mater"],
    ),
    (
        FieldCategory::Degree,
        &["degree", "education-level", "qualification"],
    ),
    (
        FieldCategory::Major,
        &["major", "field-of-study", "specialization", "subject"],
    ),
    (
        FieldCategory::GraduationYear,
        &["graduation-year", "grad-year", "year-graduated"],
    ),
    (
        FieldCategory::Linkedin,
        &["linkedin", "linkedin-profile", "linkedin-url"],
    ),
    (
        FieldCategory::Portfolio,
        &["portfolio", "website", "personal-website", "portfolio-url"],
    ),
    (
        FieldCategory::CoverLetter,
        &[
            "cover-letter",
            "message",
            "additional-info",
            "comments",
            "why-interested",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_follows_declaration_order() {
        let order: Vec<FieldCategory> = KEYWORD_TABLE.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, FieldCategory::ALL.to_vec());
        assert!(KEYWORD_TABLE.iter().all(|(_, keywords)| !keywords.is_empty()));
    }

    #[test]
    fn wire_names_parse_back() {
        for category in FieldCategory::ALL {
            assert_eq!(category.as_str().parse::<FieldCategory>().ok(), Some(category));
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        assert!("zip_code".parse::<FieldCategory>().is_err());
    }
}
