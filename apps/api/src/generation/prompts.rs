//! All LLM prompt templates for the generation module.
//!
//! Templates are deterministic: the builders interpolate opaque input
//! strings (CV text, job description, contact fields) with no sanitization.
//! Refinement templates require the model to return the ENTIRE document
//! even when only one field changed — this keeps the client free of
//! partial-update merge logic.

use crate::models::cv::{CvData, UserInfo};

/// Placeholder value for an absent LinkedIn URL. The prompt instructs the
/// model to omit the field entirely when it sees this value.
const NOT_PROVIDED: &str = "Not provided";

/// CV tailoring prompt. Placeholders: {full_name}, {email}, {phone},
/// {linkedin}, {target_jobs}, {jd_text}, {cv_text}.
const TAILOR_PROMPT_TEMPLATE: &str = r#"You are an expert CV reviewer and professional resume writer with 20 years of experience helping candidates land jobs at top tech companies.

Your task is to analyze the provided CV, job description, and candidate information, then rewrite the CV to be perfectly tailored for this specific job.

**Candidate Information (Source of Truth for Contact Details):**
- Full Name: {full_name}
- Email: {email}
- Phone: {phone}
- LinkedIn: {linkedin}
- Target Job Roles: {target_jobs}

**Instructions:**
1.  **Use Provided Contact Info:** You MUST use the Full Name, Email, Phone number, and LinkedIn URL from the "Candidate Information" section above for the contact details in the final CV. Ignore any different contact info found in the CV text.
2.  **LinkedIn Handling:** If the LinkedIn URL is 'Not provided', you MUST omit the linkedin field from the JSON output. Otherwise, use the provided URL.
3.  **Analyze Job Description:** Deeply analyze the job description to extract key requirements, skills, and qualifications.
4.  **Rewrite Summary:** Rewrite the professional summary into a concise, powerful pitch that is perfectly aligned with the job description and the candidate's stated "Target Job Roles".
5.  **Tailor Experience:** For each work experience entry, rewrite the bullet points. Use strong action verbs and quantify achievements wherever possible. Focus only on accomplishments most relevant to the target job.
6.  **Update Skills:** Refresh the skills section to feature relevant skills mentioned in the job description that the candidate possesses. Group skills logically.
7.  **Expand on Experience:** Actively look for information that can be categorized into Projects, Certifications, Awards, Leadership/Extracurriculars, Publications, and Languages. These sections are crucial for showcasing a candidate's full range of abilities, especially for students. If such information exists in the CV, populate the corresponding optional fields in the JSON output.
8.  **Integrity:** Do NOT invent new experiences or skills. Only work with the information provided in the original CV. If the original CV is missing social links like GitHub/Website, omit those fields in the output.
9.  **Formatting:** Adhere strictly to the provided JSON schema for your output.
10. **References:** If the user has provided specific references text, use that for the 'references' field. Otherwise, use the static text: "References available upon request.".

**[START JOB DESCRIPTION]**
{jd_text}
**[END JOB DESCRIPTION]**

**[START CV]**
{cv_text}
**[END CV]**

Now, based on these instructions, generate the tailored CV in the specified JSON format."#;

/// CV refinement prompt. Placeholders: {cv_json}, {user_request}.
const CV_REFINEMENT_PROMPT_TEMPLATE: &str = r#"You are an expert CV editor. Your task is to refine the provided CV based on the user's request.

**Current CV (in JSON format):**
{cv_json}

**User's Request:**
"{user_request}"

**Instructions:**
1.  Carefully analyze the user's request and the current CV data.
2.  Modify the JSON data to incorporate the user's changes.
3.  You MUST return the **entire, complete, and valid JSON object** for the CV, even if you only changed one part.
4.  Adhere strictly to the original JSON schema. Do not add or remove top-level keys. The structure must remain the same.
5.  Maintain the professional tone and quality of the CV.

Now, generate the updated and complete CV in the specified JSON format."#;

/// Cover letter prompt (from a tailored CV). Placeholders: {full_name},
/// {target_job}, {cv_excerpt_json}, {jd_text}.
const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and professional writer. Your task is to write a compelling, professional, and personalized cover letter based on the provided tailored CV and job description.

**Candidate Information:**
- Name: {full_name}

**Target Job:**
- The candidate is applying for a "{target_job}" role.

**Candidate's Tailored CV (JSON format):**
{cv_excerpt_json}

**Full Job Description:**
{jd_text}

**Instructions:**
1.  **Structure:** Write a standard professional cover letter with an introduction, body paragraphs, and a conclusion.
2.  **Introduction:** Start by addressing the hiring manager (use a generic title like "Hiring Manager" as the name is not available). State the position the candidate is applying for and where they might have seen it (e.g., on LinkedIn, company website).
3.  **Body Paragraphs (2-3):**
    -   Connect the candidate's experience and skills directly to the key requirements in the job description.
    -   Use information from the tailored CV's summary and experience sections. Highlight 2-3 key achievements or skills that are most relevant.
    -   Reflect the professional tone and keywords from the job description.
4.  **Conclusion:** Reiterate the candidate's interest in the role and the company. Include a strong call to action, suggesting an interview to discuss their qualifications further.
5.  **Tone:** The tone should be enthusiastic, confident, and professional.
6.  **Formatting:** Do not use JSON. Output only the plain text of the cover letter, including the candidate's name at the end. Do not include headers like "**Cover Letter**" or similar markdown. Just the raw text of the letter itself.

Now, write the cover letter."#;

/// Cover letter refinement prompt. Placeholders: {cover_letter}, {user_request}.
const COVER_LETTER_REFINEMENT_PROMPT_TEMPLATE: &str = r#"You are an expert cover letter editor. Your task is to refine the provided cover letter based on the user's request.

**Current Cover Letter:**
{cover_letter}

**User's Request:**
"{user_request}"

**Instructions:**
1.  Carefully analyze the user's request and the current cover letter.
2.  Modify the text to incorporate the user's changes while maintaining a professional tone.
3.  You MUST return only the plain text of the **entire, complete, and updated cover letter**.
4.  Do not add any headers, markdown, or explanations. Just the raw text of the letter itself.

Now, generate the updated cover letter."#;

/// Standalone cover letter prompt (from raw CV text, no structured CV).
/// Placeholders: {name}, {target_jobs}, {cv_text}, {jd_text}.
const STANDALONE_COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and professional writer. Your task is to write a compelling, professional, and personalized cover letter based on the provided raw CV text and a job description.

**Candidate Information:**
- Name: {name}

**Target Job:**
- The candidate is applying for a "{target_jobs}" role.

**Candidate's Full CV (Raw Text):**
{cv_text}

**Full Job Description:**
{jd_text}

**Instructions:**
1.  **Analyze CV:** First, read through the raw CV text to thoroughly understand the candidate's experience, skills, and key achievements.
2.  **Structure:** Write a standard professional cover letter with an introduction, body paragraphs, and a conclusion.
3.  **Introduction:** Start by addressing the hiring manager (use a generic title like "Hiring Manager" as the name is not available). State the position the candidate is applying for.
4.  **Body Paragraphs (2-3):**
    -   Connect the candidate's profile (from the provided CV text) directly to the key requirements in the job description.
    -   Highlight 2-3 of the most relevant achievements or skills from their CV.
    -   Reflect the professional tone and keywords from the job description.
5.  **Conclusion:** Reiterate the candidate's interest in the role and the company. Include a strong call to action.
6.  **Tone:** The tone should be enthusiastic, confident, and professional.
7.  **Formatting:** Do not use JSON. Output only the plain text of the cover letter, including the candidate's name at the end. Do not include headers or markdown.

Now, write the cover letter."#;

pub fn build_tailor_prompt(cv_text: &str, jd_text: &str, user_info: &UserInfo) -> String {
    TAILOR_PROMPT_TEMPLATE
        .replace("{full_name}", &user_info.name)
        .replace("{email}", &user_info.email)
        .replace("{phone}", &user_info.phone)
        .replace(
            "{linkedin}",
            user_info
                .linkedin
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(NOT_PROVIDED),
        )
        .replace("{target_jobs}", &user_info.target_jobs)
        .replace("{jd_text}", jd_text)
        .replace("{cv_text}", cv_text)
}

pub fn build_cv_refinement_prompt(cv_json: &str, user_request: &str) -> String {
    CV_REFINEMENT_PROMPT_TEMPLATE
        .replace("{cv_json}", cv_json)
        .replace("{user_request}", user_request)
}

/// Only the summary, experience, and skills sections are embedded — enough
/// signal for the letter without pasting the whole résumé back in.
pub fn build_cover_letter_prompt(cv: &CvData, jd_text: &str, target_job: &str) -> String {
    let excerpt = serde_json::json!({
        "summary": cv.summary,
        "experience": cv.experience,
        "skills": cv.skills,
    });
    let excerpt_json =
        serde_json::to_string_pretty(&excerpt).unwrap_or_else(|_| excerpt.to_string());

    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{full_name}", &cv.full_name)
        .replace("{target_job}", target_job)
        .replace("{cv_excerpt_json}", &excerpt_json)
        .replace("{jd_text}", jd_text)
}

pub fn build_cover_letter_refinement_prompt(current: &str, user_request: &str) -> String {
    COVER_LETTER_REFINEMENT_PROMPT_TEMPLATE
        .replace("{cover_letter}", current)
        .replace("{user_request}", user_request)
}

pub fn build_standalone_cover_letter_prompt(
    cv_text: &str,
    jd_text: &str,
    user_info: &UserInfo,
) -> String {
    STANDALONE_COVER_LETTER_PROMPT_TEMPLATE
        .replace("{name}", &user_info.name)
        .replace("{target_jobs}", &user_info.target_jobs)
        .replace("{cv_text}", cv_text)
        .replace("{jd_text}", jd_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::fixtures;

    fn user_info(linkedin: Option<&str>) -> UserInfo {
        UserInfo {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+44 7000 000000".to_string(),
            location: "London".to_string(),
            target_jobs: "Senior Backend Engineer".to_string(),
            linkedin: linkedin.map(String::from),
            referral_source: "LinkedIn".to_string(),
            employment_status: "Employed".to_string(),
        }
    }

    #[test]
    fn test_tailor_prompt_embeds_inputs_between_markers() {
        let prompt = build_tailor_prompt(
            "Software Engineer at Acme, 2019-2022",
            "Senior Backend Engineer, Go, Kubernetes",
            &user_info(None),
        );
        let jd_start = prompt.find("**[START JOB DESCRIPTION]**").unwrap();
        let jd_end = prompt.find("**[END JOB DESCRIPTION]**").unwrap();
        let cv_start = prompt.find("**[START CV]**").unwrap();
        assert!(jd_start < jd_end && jd_end < cv_start);
        assert!(prompt[jd_start..jd_end].contains("Senior Backend Engineer, Go, Kubernetes"));
        assert!(prompt[cv_start..].contains("Software Engineer at Acme, 2019-2022"));
    }

    #[test]
    fn test_tailor_prompt_uses_trusted_contact_fields() {
        let prompt = build_tailor_prompt("cv", "jd", &user_info(Some("https://linkedin.com/in/j")));
        assert!(prompt.contains("- Full Name: Jane Doe"));
        assert!(prompt.contains("- Email: jane@example.com"));
        assert!(prompt.contains("- LinkedIn: https://linkedin.com/in/j"));
        assert!(prompt.contains("Ignore any different contact info found in the CV text"));
    }

    #[test]
    fn test_tailor_prompt_marks_absent_linkedin_as_not_provided() {
        let prompt = build_tailor_prompt("cv", "jd", &user_info(None));
        assert!(prompt.contains("- LinkedIn: Not provided"));

        let blank = build_tailor_prompt("cv", "jd", &user_info(Some("   ")));
        assert!(blank.contains("- LinkedIn: Not provided"));
    }

    #[test]
    fn test_tailor_prompt_forbids_invention_and_fixes_references() {
        let prompt = build_tailor_prompt("cv", "jd", &user_info(None));
        assert!(prompt.contains("Do NOT invent new experiences or skills"));
        assert!(prompt.contains("References available upon request."));
    }

    #[test]
    fn test_refinement_prompt_requires_complete_object() {
        let prompt = build_cv_refinement_prompt("{\"fullName\": \"Jane\"}", "shorten the summary");
        assert!(prompt.contains("entire, complete, and valid JSON object"));
        assert!(prompt.contains("Do not add or remove top-level keys"));
        assert!(prompt.contains("\"shorten the summary\""));
    }

    #[test]
    fn test_cover_letter_prompt_embeds_excerpt_not_full_cv() {
        let cv = fixtures::full_cv();
        let prompt = build_cover_letter_prompt(&cv, "jd text", "Senior Backend Engineer");
        assert!(prompt.contains("\"summary\""));
        assert!(prompt.contains("\"experience\""));
        // Education is not part of the excerpt.
        assert!(!prompt.contains("University of Manchester"));
        assert!(prompt.contains("applying for a \"Senior Backend Engineer\" role"));
    }

    #[test]
    fn test_cover_letter_refinement_requires_full_letter() {
        let prompt = build_cover_letter_refinement_prompt("Dear Hiring Manager...", "make it shorter");
        assert!(prompt.contains("entire, complete, and updated cover letter"));
    }

    #[test]
    fn test_standalone_cover_letter_embeds_raw_cv() {
        let prompt =
            build_standalone_cover_letter_prompt("raw cv body", "jd body", &user_info(None));
        assert!(prompt.contains("raw cv body"));
        assert!(prompt.contains("jd body"));
        assert!(prompt.contains("- Name: Jane Doe"));
    }
}
