//! Structured CV data — the shape the generative API is asked to produce.
//!
//! Field names serialize as camelCase to match the JSON schema sent with
//! schema-constrained requests (`generation::schema`). The client never
//! invents values in this structure; it is produced only by the generative
//! API, which is instructed not to fabricate facts absent from the input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fallback for the references section when the source CV supplies none.
/// The prompt instructs the model to emit exactly this string.
pub const DEFAULT_REFERENCES: &str = "References available upon request.";

/// Contact and targeting details supplied directly by the candidate.
/// Trusted verbatim — the prompt tells the model to prefer these fields
/// over any contact info embedded in the CV text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub location: String,
    /// Target job title(s), free text.
    pub target_jobs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub referral_source: String,
    #[serde(default)]
    pub employment_status: String,
}

/// The full tailored résumé as returned by the generative API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    /// Categorized skill lists, keyed by category name. BTreeMap keeps
    /// category order stable across serialize/deserialize round trips.
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<Award>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leadership: Option<Vec<LeadershipRole>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<LanguageSkill>>,
    pub references: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub job_title: String,
    pub company: String,
    pub location: String,
    /// e.g. "Jan 2020 - Present"
    pub dates: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub university: String,
    pub dates: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub name: String,
    pub awarded_by: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipRole {
    pub role: String,
    pub organization: String,
    pub dates: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSkill {
    pub language: String,
    pub proficiency: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A fully-populated CvData for export and serde tests.
    pub fn full_cv() -> CvData {
        let mut skills = BTreeMap::new();
        skills.insert(
            "Programming Languages".to_string(),
            vec!["Go".to_string(), "Rust".to_string()],
        );
        skills.insert(
            "Tools & Platforms".to_string(),
            vec!["Kubernetes".to_string(), "Docker".to_string()],
        );

        CvData {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+44 7000 000000".to_string(),
            linkedin: Some("https://linkedin.com/in/janedoe".to_string()),
            github: None,
            website: None,
            summary: "Backend engineer with six years of experience building distributed services."
                .to_string(),
            experience: vec![ExperienceEntry {
                job_title: "Software Engineer".to_string(),
                company: "Acme".to_string(),
                location: "London, UK".to_string(),
                dates: "2019 - 2022".to_string(),
                responsibilities: vec![
                    "Built payment reconciliation pipeline processing 2M events per day"
                        .to_string(),
                    "Reduced p99 API latency by 40% through query optimization".to_string(),
                ],
            }],
            education: vec![EducationEntry {
                degree: "B.S. in Computer Science".to_string(),
                university: "University of Manchester".to_string(),
                dates: "2012 - 2016".to_string(),
            }],
            skills,
            projects: Some(vec![Project {
                name: "cachekit".to_string(),
                description: "An embeddable LRU cache library.".to_string(),
                technologies: Some(vec!["Rust".to_string()]),
                link: None,
            }]),
            certifications: Some(vec![Certification {
                name: "CKA".to_string(),
                issuer: "CNCF".to_string(),
                date: "2021".to_string(),
            }]),
            awards: Some(vec![Award {
                name: "Engineering Excellence Award".to_string(),
                awarded_by: "Acme".to_string(),
                date: "2021".to_string(),
                summary: None,
            }]),
            leadership: Some(vec![LeadershipRole {
                role: "Tech Lead".to_string(),
                organization: "Acme Platform Guild".to_string(),
                dates: "2021 - 2022".to_string(),
                responsibilities: vec!["Mentored four junior engineers".to_string()],
            }]),
            publications: Some(vec![Publication {
                title: "Scaling reconciliation systems".to_string(),
                authors: None,
                journal: Some("Acme Engineering Blog".to_string()),
                date: Some("2022".to_string()),
                link: None,
            }]),
            languages: Some(vec![LanguageSkill {
                language: "English".to_string(),
                proficiency: "Native".to_string(),
            }]),
            references: DEFAULT_REFERENCES.to_string(),
        }
    }

    /// A minimal CvData with every optional section absent.
    pub fn minimal_cv() -> CvData {
        let full = full_cv();
        CvData {
            linkedin: None,
            projects: None,
            certifications: None,
            awards: None,
            leadership: None,
            publications: None,
            languages: None,
            ..full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cv_data_serializes_camel_case() {
        let cv = fixtures::full_cv();
        let value = serde_json::to_value(&cv).unwrap();
        assert!(value.get("fullName").is_some());
        assert!(value.get("full_name").is_none());
        assert_eq!(
            value["experience"][0]["jobTitle"],
            serde_json::json!("Software Engineer")
        );
        assert_eq!(
            value["awards"][0]["awardedBy"],
            serde_json::json!("Acme")
        );
    }

    #[test]
    fn test_absent_optional_fields_are_omitted() {
        let cv = fixtures::minimal_cv();
        let value = serde_json::to_value(&cv).unwrap();
        assert!(value.get("linkedin").is_none());
        assert!(value.get("github").is_none());
        assert!(value.get("projects").is_none());
        assert!(value.get("languages").is_none());
    }

    #[test]
    fn test_cv_data_round_trips() {
        let cv = fixtures::full_cv();
        let json = serde_json::to_string(&cv).unwrap();
        let back: CvData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.full_name, cv.full_name);
        assert_eq!(back.experience.len(), 1);
        assert_eq!(back.skills.len(), 2);
        assert_eq!(back.references, DEFAULT_REFERENCES);
    }

    #[test]
    fn test_missing_required_field_fails_deserialization() {
        // No "references" key — required by the schema.
        let json = r#"{
            "fullName": "Jane Doe",
            "email": "jane@example.com",
            "phone": "123",
            "summary": "s",
            "experience": [],
            "education": [],
            "skills": {}
        }"#;
        let result: Result<CvData, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
