//! Single prompt for ATS keyword extraction, scoring and feedback

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub ats_analysis: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            ats_analysis: ATS_ANALYSIS_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub job_description: String,
    pub resume_text: String,
    pub keyword_limit: usize,
    pub summary_sentences: usize,
    pub max_summary_chars: usize,
}

impl PromptTemplates {
    pub fn render_ats_analysis(&self, params: &PromptParams) -> String {
        // Inputs are substituted last so placeholder-like text inside them is left alone
        self.ats_analysis
            .replace("{keyword_limit}", &params.keyword_limit.to_string())
            .replace("{summary_sentences}", &params.summary_sentences.to_string())
            .replace("{max_summary_chars}", &params.max_summary_chars.to_string())
            .replace("{resume}", "\u{0}RESUME\u{0}")
            .replace("{job}", &params.job_description)
            .replace("\u{0}RESUME\u{0}", &params.resume_text)
    }
}

const ATS_ANALYSIS_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) and a highly experienced career coach. Your task is to meticulously analyze a job description and a resume.

OBJECTIVE:
1. FIRST, from the job description ONLY, identify up to {keyword_limit} highly essential ATS keywords: critical skills, tools and responsibilities an Applicant Tracking System would strictly prioritize. Do NOT look at the resume for this step.
2. THEN compare ONLY those keywords against the resume and split them into two lists:
   - found: keywords present in the resume.
   - missing: keywords absent from the resume. A keyword that literally appears in the resume is never missing.
   Every identified keyword goes into exactly one list, so found + missing together hold at most {keyword_limit} keywords.
3. Calculate a match score from 0 to 100.
4. Provide detailed, actionable feedback on how to improve the resume's ATS compatibility for this specific job.

SCORING CRITERIA (out of 100):
- Direct keyword matches (40%): exact or very close matches of essential skills, tools and responsibilities from the job description.
- Semantic relevance (30%): how well the resume demonstrates experience in the core areas even without the exact keywords.
- Quantifiable achievements (15%): numbers, metrics and results that demonstrate impact.
- Overall fit and structure (10%): professional formatting, clear sections, action verbs, conciseness.
- Missing critical skills (5% penalty): absolutely critical skills from the job description that the resume lacks.

<JOB DESCRIPTION>
{job}
</JOB DESCRIPTION>

<RESUME>
{resume}
</RESUME>

OUTPUT FORMAT:
Respond with a single JSON object and nothing else, using exactly this structure:
{
  "match_score": 0,
  "feedback": {
    "overall_summary": "string",
    "keywords": {
      "found": ["keyword1", "keyword2"],
      "missing": ["keyword3", "keyword4"],
      "suggestions": "string"
    },
    "formatting_suggestions": ["string"],
    "additional_tips": "string"
  }
}

FIELD RULES:
- match_score: integer between 0 and 100.
- overall_summary: exactly {summary_sentences} complete sentences, under {max_summary_chars} characters in total. No fragments, no truncation.
- keywords.suggestions: specific advice on integrating the missing keywords in context.
- formatting_suggestions: formatting and structural improvements an ATS would look for that are not already present in the resume. Be specific about what to change and where.
- additional_tips: any further advice for this application.

IMPORTANT:
- Be highly accurate in identifying keywords.
- Provide concrete, actionable advice in a professional and helpful tone.
- The JSON must always be complete and valid. Do not truncate any string or the overall structure."#;
