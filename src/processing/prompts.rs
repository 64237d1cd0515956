//! Instruction templates sent to the language model.
//!
//! The summarizer template demands a literature-review-style structured
//! summary; the Q&A templates demand answers grounded strictly in the
//! supplied context. Wording changes here directly change product behavior,
//! so the templates are kept in one place.

/// Literal sentence the grounded Q&A template instructs the model to emit
/// when the context does not contain the answer.
pub const NO_ANSWER_FALLBACK: &str = "The information is not available in the provided context";

/// Build the structured-summary instruction prompt for a document.
pub fn summary_prompt(document: &str) -> String {
    format!(
        r#"You are an AI assistant specializing in creating detailed summaries of academic documents for literature reviews.
Your task is to summarize the document following these EXACT guidelines:

1. Identify the main theories or concepts discussed

Instruction:
List only the theories, frameworks, or core concepts explicitly mentioned in the text.
For each one, provide a one-sentence definition based only on the paper's explanation, not external knowledge.

2. Summarize the key findings from relevant studies

Instruction:
Extract the findings the paper attributes to previous research.
Do not generalize or add new findings.
Present each finding as a short bullet (<=15 words), citing the study name or number when possible.

3. Highlight areas of agreement or consensus in the research

Instruction:
Identify points where multiple studies or the authors consistently agree.
Only include consensus explicitly stated or strongly implied in the text.
Summaries must be <=1 sentence per point.

4. Summarize the methodologies used in the research

Instruction:
Describe the research methods used in this paper only, not in other studies.
Mention only what is explicitly written: e.g., literature review, conceptual framework, case references.
Keep the description objective and concise.

5. Provide an overview of the potential implications of the research

Instruction:
List 3-5 implications clearly grounded in the authors' claims (not speculation).
Explain implications in terms of impact on:
- manufacturing
- AI/ML
- system design
- future agentic systems (if mentioned)

6. Suggest possible directions for future research based on the current literature

Instruction:
Only include directions that the authors mention or logically follow from explicitly identified gaps/challenges.
Phrase each direction as a research question or actionable direction.

7. If the paper describes an architecture, explain it stepwise

Instruction:
Describe the architecture exactly as defined in the paper, without adding components not mentioned.
Break the architecture into steps/modules in the order used by the paper.
Provide:
- a one-sentence purpose of the architecture
- step-by-step description
- a short note on how each module interacts

8. Mathematical Aspects (if applicable)

Instruction:
Describe and explain the key mathematical models, theorems, or equations used in the paper.
For each equation, format it in LaTeX style using: $equation$

Document text:
{document}"#
    )
}

/// Build the grounded Q&A prompt for the summary-backed flow.
///
/// The context places the summary first and the instructions explicitly
/// prime the model to check it before the full text.
pub fn summary_qa_prompt(summary: &str, full_text: &str, question: &str) -> String {
    format!(
        r#"You are an AI research assistant. Use the provided context from research papers to answer the question as accurately as possible.

IMPORTANT: The context includes a Document Summary section at the beginning. Check the summary FIRST - it contains key information about the document including mathematical equations, concepts, and findings.

Instructions:
1. First, check the Document Summary section - it often contains the answer you need.
2. Then check the full document text for additional details.
3. If the question asks about a concept mentioned in the summary, use that information to answer.
4. Include mathematical formulations, equations, or examples if they are in the context.
5. Explain the concept clearly based on what the context says.
6. Only respond with "{NO_ANSWER_FALLBACK}" if you cannot find the answer anywhere in the context.

Context: Document Summary:
{summary}

Full Document Text:
{full_text}
Question: {question}
Answer:"#
    )
}

/// Build the simpler answer-from-the-paper prompt for the full-text flow.
pub fn full_text_qa_prompt(full_text: &str, question: &str) -> String {
    format!(
        r#"You are an AI research assistant. Answer the question based on the provided research paper text.
Be comprehensive and detailed in your response. Include specific examples, equations, or concepts from the paper when relevant.

Paper Text:
{full_text}

Question: {question}
Answer:"#
    )
}
