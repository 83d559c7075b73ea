// Analysis Request Builder prompt template.
// The resume text is inserted verbatim: no escaping, no truncation.

pub const RESUME_ANALYSIS_PROMPT: &str = "\
You are an expert recruiter and ATS system. Analyze the following resume text and provide:
1. An ATS score (0–100) based on clarity, keywords, and formatting.
2. Strengths of the resume.
3. Weaknesses / missing elements.
4. Specific suggestions to improve the resume.

Resume:
{resume_text}
";
