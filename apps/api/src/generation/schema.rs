//! Declared output shape for schema-constrained résumé calls.
//!
//! This is the Gemini `responseSchema` mirror of `models::cv::CvData`.
//! Core fields are required; optional sections carry descriptions telling
//! the model to omit them when the source CV has nothing to fill them with.

use serde_json::{json, Value};

/// Top-level fields the model must always emit.
pub const REQUIRED_FIELDS: &[&str] = &[
    "fullName",
    "email",
    "phone",
    "summary",
    "experience",
    "education",
    "skills",
    "references",
];

pub fn cv_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "fullName": { "type": "STRING", "description": "The candidate's full name, taken from the provided user info." },
            "email": { "type": "STRING", "description": "The candidate's email address, taken from the provided user info." },
            "phone": { "type": "STRING", "description": "The candidate's phone number, taken from the provided user info." },
            "linkedin": { "type": "STRING", "description": "URL to the candidate's LinkedIn profile. Use the one from the provided 'Candidate Information'. Omit if not provided." },
            "github": { "type": "STRING", "description": "URL to the candidate's GitHub profile. Omit if not present in the original CV." },
            "website": { "type": "STRING", "description": "URL to the candidate's personal website or portfolio. Omit if not present in the original CV." },
            "summary": { "type": "STRING", "description": "A 3-5 sentence professional summary, rewritten to be a powerful pitch aligned with the job description and target roles." },
            "experience": {
                "type": "ARRAY",
                "description": "The candidate's relevant work experience.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "jobTitle": { "type": "STRING" },
                        "company": { "type": "STRING" },
                        "location": { "type": "STRING" },
                        "dates": { "type": "STRING", "description": "e.g., 'Jan 2020 - Present'" },
                        "responsibilities": {
                            "type": "ARRAY",
                            "description": "Bulleted list of 3-5 key achievements and responsibilities, rewritten using action verbs and quantified results relevant to the job description.",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["jobTitle", "company", "location", "dates", "responsibilities"]
                }
            },
            "education": {
                "type": "ARRAY",
                "description": "The candidate's education history.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "degree": { "type": "STRING", "description": "e.g., 'B.S. in Computer Science'" },
                        "university": { "type": "STRING" },
                        "dates": { "type": "STRING", "description": "e.g., 'Aug 2016 - May 2020'" }
                    },
                    "required": ["degree", "university", "dates"]
                }
            },
            "skills": {
                "type": "OBJECT",
                "description": "A categorized list of the candidate's skills, updated to include keywords from the job description.",
                "properties": {
                    "Programming Languages": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "Frameworks & Libraries": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "Tools & Platforms": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "Other Skills": { "type": "ARRAY", "items": { "type": "STRING" } }
                }
            },
            "projects": {
                "type": "ARRAY",
                "description": "A list of personal or academic projects. Highly important for showcasing practical skills, especially for students or career changers. Omit if not present.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "The project's name." },
                        "description": { "type": "STRING", "description": "A brief description of the project, its purpose, and outcome." },
                        "technologies": { "type": "ARRAY", "items": { "type": "STRING" }, "description": "List of technologies or tools used." },
                        "link": { "type": "STRING", "description": "A URL to the project repository or live demo. Omit if not provided." }
                    }
                }
            },
            "certifications": {
                "type": "ARRAY",
                "description": "A list of relevant professional certifications. Omit if not present.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "The name of the certification." },
                        "issuer": { "type": "STRING", "description": "The organization that issued the certification." },
                        "date": { "type": "STRING", "description": "The date the certification was obtained." }
                    }
                }
            },
            "awards": {
                "type": "ARRAY",
                "description": "A list of awards, honors, or scholarships. Omit if not present.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "The name of the award." },
                        "awardedBy": { "type": "STRING", "description": "The organization that gave the award." },
                        "date": { "type": "STRING", "description": "The date the award was received." },
                        "summary": { "type": "STRING", "description": "A brief description of the achievement. Omit if not needed." }
                    }
                }
            },
            "leadership": {
                "type": "ARRAY",
                "description": "A list of leadership roles or significant extracurricular activities. Omit if not present.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "role": { "type": "STRING", "description": "The title or role held." },
                        "organization": { "type": "STRING", "description": "The name of the club, society, or organization." },
                        "dates": { "type": "STRING", "description": "The duration of the role." },
                        "responsibilities": { "type": "ARRAY", "items": { "type": "STRING" }, "description": "Bulleted list of key responsibilities and achievements in the role." }
                    }
                }
            },
            "publications": {
                "type": "ARRAY",
                "description": "A list of publications or presentations. Especially relevant for academic or research roles. Omit if not present.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "authors": { "type": "ARRAY", "items": { "type": "STRING" } },
                        "journal": { "type": "STRING", "description": "The journal, conference, or publication venue." },
                        "date": { "type": "STRING" },
                        "link": { "type": "STRING", "description": "A URL to the publication. Omit if not provided." }
                    }
                }
            },
            "languages": {
                "type": "ARRAY",
                "description": "A list of languages and proficiency levels. Omit if not present.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "language": { "type": "STRING" },
                        "proficiency": { "type": "STRING", "description": "e.g., 'Native', 'Fluent', 'Conversational'" }
                    }
                }
            },
            "references": { "type": "STRING", "description": "The static text 'References available upon request.' or a list of provided references." }
        },
        "required": REQUIRED_FIELDS
    })
}
