// Recruiter prompt template. Slots: {question} (job description), {context} (CV chunks).

pub const RECRUITER_PROMPT_TEMPLATE: &str = "You are an expert recruiter helping to evaluate CVs against a job description.
Each chunk below includes the candidate’s CV name.
Use this information to explain which CVs best fit the role.
Mention the CV name when discussing strengths/weaknesses.

Job Description:
{question}

Relevant CV Chunks:
{context}

Answer in a recruiter style, grouping analysis by CV name and ranking candidates from strongest to weakest.
";

/// Fills the recruiter template in a single pass, so slot markers that happen
/// to appear inside the job description or CV text are left untouched.
pub fn render_recruiter_prompt(question: &str, context: &str) -> String {
    fill_slots(
        RECRUITER_PROMPT_TEMPLATE,
        &[("question", question), ("context", context)],
    )
}

fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            slots
                .iter()
                .find(|(slot, _)| *slot == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
