//! Document flow — the renderer-independent intermediate form.
//!
//! Both the PDF and DOCX writers consume a `DocumentFlow`, so section
//! ordering and omission rules live here exactly once.

use crate::models::cv::CvData;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    Bullet(String),
}

#[derive(Debug, Clone)]
pub struct Section {
    /// Empty heading renders the blocks without a section header
    /// (used by cover letters).
    pub heading: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone)]
pub struct DocumentFlow {
    pub title: String,
    /// Contact details joined with " | "; empty for cover letters.
    pub contact_line: String,
    pub sections: Vec<Section>,
}

/// Flattens a CV into render order: summary, experience, projects,
/// education, skills, leadership, awards, certifications, publications,
/// languages, references. Sections with no content are dropped.
pub fn cv_flow(cv: &CvData) -> DocumentFlow {
    let mut sections = Vec::new();

    if !cv.summary.trim().is_empty() {
        sections.push(Section {
            heading: "Professional Summary".to_string(),
            blocks: vec![Block::Paragraph(cv.summary.clone())],
        });
    }

    if !cv.experience.is_empty() {
        let mut blocks = Vec::new();
        for entry in &cv.experience {
            blocks.push(Block::Paragraph(format!(
                "{}, {} ({}) | {}",
                entry.job_title, entry.company, entry.location, entry.dates
            )));
            for responsibility in &entry.responsibilities {
                blocks.push(Block::Bullet(responsibility.clone()));
            }
        }
        sections.push(Section {
            heading: "Experience".to_string(),
            blocks,
        });
    }

    if let Some(projects) = cv.projects.as_ref().filter(|p| !p.is_empty()) {
        let mut blocks = Vec::new();
        for project in projects {
            blocks.push(Block::Paragraph(project.name.clone()));
            blocks.push(Block::Bullet(project.description.clone()));
            if let Some(technologies) = project.technologies.as_ref().filter(|t| !t.is_empty()) {
                blocks.push(Block::Bullet(format!(
                    "Technologies: {}",
                    technologies.join(", ")
                )));
            }
            if let Some(link) = &project.link {
                blocks.push(Block::Bullet(link.clone()));
            }
        }
        sections.push(Section {
            heading: "Projects".to_string(),
            blocks,
        });
    }

    if !cv.education.is_empty() {
        let blocks = cv
            .education
            .iter()
            .map(|entry| {
                Block::Paragraph(format!(
                    "{}, {} | {}",
                    entry.degree, entry.university, entry.dates
                ))
            })
            .collect();
        sections.push(Section {
            heading: "Education".to_string(),
            blocks,
        });
    }

    if !cv.skills.is_empty() {
        let blocks = cv
            .skills
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(category, items)| Block::Paragraph(format!("{category}: {}", items.join(", "))))
            .collect::<Vec<_>>();
        if !blocks.is_empty() {
            sections.push(Section {
                heading: "Skills".to_string(),
                blocks,
            });
        }
    }

    if let Some(roles) = cv.leadership.as_ref().filter(|r| !r.is_empty()) {
        let mut blocks = Vec::new();
        for role in roles {
            blocks.push(Block::Paragraph(format!(
                "{}, {} | {}",
                role.role, role.organization, role.dates
            )));
            for responsibility in &role.responsibilities {
                blocks.push(Block::Bullet(responsibility.clone()));
            }
        }
        sections.push(Section {
            heading: "Leadership & Activities".to_string(),
            blocks,
        });
    }

    if let Some(awards) = cv.awards.as_ref().filter(|a| !a.is_empty()) {
        let blocks = awards
            .iter()
            .map(|award| {
                let mut line = format!("{}, {} | {}", award.name, award.awarded_by, award.date);
                if let Some(summary) = &award.summary {
                    line.push_str(": ");
                    line.push_str(summary);
                }
                Block::Bullet(line)
            })
            .collect();
        sections.push(Section {
            heading: "Awards & Honors".to_string(),
            blocks,
        });
    }

    if let Some(certifications) = cv.certifications.as_ref().filter(|c| !c.is_empty()) {
        let blocks = certifications
            .iter()
            .map(|cert| Block::Bullet(format!("{}, {} | {}", cert.name, cert.issuer, cert.date)))
            .collect();
        sections.push(Section {
            heading: "Certifications".to_string(),
            blocks,
        });
    }

    if let Some(publications) = cv.publications.as_ref().filter(|p| !p.is_empty()) {
        let blocks = publications
            .iter()
            .map(|publication| {
                let mut line = publication.title.clone();
                if let Some(authors) = publication.authors.as_ref().filter(|a| !a.is_empty()) {
                    line.push_str(&format!(" ({})", authors.join(", ")));
                }
                if let Some(journal) = &publication.journal {
                    line.push_str(&format!(" | {journal}"));
                }
                if let Some(date) = &publication.date {
                    line.push_str(&format!(" | {date}"));
                }
                Block::Bullet(line)
            })
            .collect();
        sections.push(Section {
            heading: "Publications".to_string(),
            blocks,
        });
    }

    if let Some(languages) = cv.languages.as_ref().filter(|l| !l.is_empty()) {
        let line = languages
            .iter()
            .map(|l| format!("{} ({})", l.language, l.proficiency))
            .collect::<Vec<_>>()
            .join(", ");
        sections.push(Section {
            heading: "Languages".to_string(),
            blocks: vec![Block::Paragraph(line)],
        });
    }

    if !cv.references.trim().is_empty() {
        sections.push(Section {
            heading: "References".to_string(),
            blocks: vec![Block::Paragraph(cv.references.clone())],
        });
    }

    DocumentFlow {
        title: cv.full_name.clone(),
        contact_line: contact_line(cv),
        sections,
    }
}

/// Flattens a free-text cover letter. Blank lines separate paragraphs.
pub fn cover_letter_flow(full_name: &str, body: &str) -> DocumentFlow {
    let blocks = body
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| Block::Paragraph(paragraph.replace('\n', " ")))
        .collect();
    DocumentFlow {
        title: full_name.to_string(),
        contact_line: String::new(),
        sections: vec![Section {
            heading: String::new(),
            blocks,
        }],
    }
}

fn contact_line(cv: &CvData) -> String {
    let mut parts = vec![cv.email.as_str(), cv.phone.as_str()];
    for optional in [&cv.linkedin, &cv.github, &cv.website] {
        if let Some(value) = optional {
            parts.push(value);
        }
    }
    parts.join(" | ")
}
