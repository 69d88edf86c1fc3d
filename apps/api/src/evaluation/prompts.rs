// Prompt text for the resume/JD match scorer.

/// Opening persona of the scoring prompt. Swapped out on the sentinel retry.
pub const ATS_PERSONA: &str = "Act as an expert ATS system";

/// Persona used for the single stricter re-query.
pub const STRICT_RECRUITER_PERSONA: &str = "You are a strict recruiter";

/// JSON key the model is asked to answer with.
pub const MATCH_KEY: &str = "JD Match";

/// Builds the scoring prompt embedding the extracted resume text and the job description.
pub fn build_match_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        r#"
{ATS_PERSONA}. Compare this resume and job description. Score based on these criteria:

- Keyword Match (40% weight): Does the resume include key job-specific terms from the JD?
- Job Title & Role Match (20% weight): Does the resume have a matching or similar role?
- Skills & Tools Match (20% weight): Are the required tools/skills mentioned?
- Soft Skills & Experience Fit (20% weight): Evaluate any relevant professional traits such as adaptability, teamwork, time management, critical thinking, creativity, leadership, communication, or others mentioned in the job description or evident in the resume.

Output JSON in this format:
{{
  "{MATCH_KEY}": "<final % score based on above breakdown>"
}}

Resume:
{resume_text}

Job Description:
{job_description}
"#
    )
}

/// Rewrites every occurrence of the ATS persona into the strict-recruiter persona.
pub fn strict_recruiter_prompt(prompt: &str) -> String {
    prompt.replace(ATS_PERSONA, STRICT_RECRUITER_PERSONA)
}
