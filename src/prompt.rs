// src/prompt.rs
//
// The prompt contract: fixed instruction text that disciplines the model's
// output shape. The analysis client's parsing tolerance is calibrated
// against exactly this contract.

pub const GEMINI_MODEL_NAME: &str = "gemini-2.5-flash-preview-04-17";

/// Message shown whenever a failure is classified as credential-related.
pub const CREDENTIAL_ERROR_MESSAGE: &str =
    "API Key is invalid or has insufficient permissions. Please check your GEMINI_API_KEY environment variable.";

/// The per-request instruction sent alongside the image part.
pub const USER_INSTRUCTION: &str =
    "Analyze the broken object in the provided image according to the system instructions.";

/// System instruction sent with every request. The client depends on each of
/// these clauses: single JSON object, no fences, isFixable bool|"maybe",
/// null repairMethods/estimatedCost when not fixable, High/Medium/Low
/// confidence.
pub const SYSTEM_PROMPT: &str = r#"
You are an expert in object repair and cost estimation.
Analyze the provided image of a broken object.
Determine if the object is fixable.
If it is fixable, suggest 1 to 3 potential repair methods and provide an estimated repair cost range in Indian Rupees (e.g., ₹1500 - ₹4000 INR).
If it is not fixable, explain why. If "maybe" fixable, explain the uncertainties.
Provide your response STRICTLY in JSON format with the following structure:
{
  "objectName": "A concise name for the object, e.g., Ceramic Mug, Wooden Chair Leg, Smartphone Screen",
  "isFixable": true | false | "maybe",
  "fixabilityReason": "Brief explanation. Required if not fixable or 'maybe'. Optional if clearly fixable.",
  "repairMethods": [
    { "method": "e.g., Epoxy glue", "description": "Brief details about this repair method." }
  ] | null,
  "estimatedCost": "e.g., ₹400 - ₹1200 INR" | null,
  "confidenceScore": "High" | "Medium" | "Low"
}
If the object is not fixable, repairMethods and estimatedCost must be null.
If the image does not clearly show a broken object, or if the object is unidentifiable, state that in fixabilityReason and set isFixable to "maybe".
Do not include any explanatory text or markdown formatting outside of the JSON object itself.
The entire response must be a single valid JSON object.
"#;
