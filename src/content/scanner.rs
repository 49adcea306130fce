use crate::domain::{ClassifiedField, FieldDescriptor};

use super::{
    classifier::classify,
    page::{FieldHandle, FormDocument},
};

/// Terms that mark a control as part of a job application form.
pub const JOB_APPLICATION_TERMS: &[&str] = &[
    "name",
    "email",
    "phone",
    "address",
    "city",
    "state",
    "zip",
    "experience",
    "company",
    "title",
    "position",
    "university",
    "degree",
    "linkedin",
    "portfolio",
    "cover",
    "message",
    "why",
    "interested",
    "applicant",
    "candidate",
    "resume",
    "cv",
    "qualification",
];

/// Whether a control should be considered for filling at all.
pub fn is_relevant(descriptor: &FieldDescriptor) -> bool {
    if descriptor.kind.is_control_button() {
        return false;
    }
    if !descriptor.value.trim().is_empty() {
        return false;
    }
    let text = descriptor.search_text();
    JOB_APPLICATION_TERMS.iter().any(|term| text.contains(term))
}

/// Indices of the relevant controls, in document order.
pub fn find_relevant_fields<D: FormDocument>(document: &D) -> Vec<usize> {
    document
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| is_relevant(&field.descriptor()))
        .map(|(index, _)| index)
        .collect()
}

/// Relevant controls that map to a profile category, in document order.
pub fn scan<D: FormDocument>(document: &D) -> Vec<ClassifiedField> {
    let fields = document.fields();
    let mut classified = Vec::new();
    for index in find_relevant_fields(document) {
        let descriptor = fields[index].descriptor();
        let Some(category) = classify(&descriptor) else {
            continue;
        };
        classified.push(ClassifiedField {
            index,
            category,
            identifier: descriptor.identifier(),
            placeholder: descriptor.placeholder.clone(),
        });
    }
    tracing::debug!(
        target: "content",
        total = fields.len(),
        classified = classified.len(),
        "scan finished"
    );
    classified
}
