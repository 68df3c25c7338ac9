//! Prompt text and fixed user-facing messages.

use crate::catalog::Product;

pub const SYSTEM_PROMPT: &str = "You are a professional beauty advisor helping create \
personalized skincare and beauty routines. Only provide advice about beauty, skincare, haircare, \
makeup and related topics: the generated routine, product usage and application, skincare \
concerns and solutions, haircare tips, makeup application and beauty product recommendations. \
If asked about unrelated topics, politely redirect to beauty discussions.";

pub const EMPTY_SELECTION_MESSAGE: &str =
    "Please select some products first to generate a routine.";

pub const OFF_TOPIC_MESSAGE: &str = "Sorry, I only have knowledge regarding beauty routines, \
skincare, haircare, makeup, or other beauty-related topics.";

pub const ROUTINE_FAILED_MESSAGE: &str =
    "Sorry, there was an error generating your routine. Please try again.";

pub const QUESTION_FAILED_MESSAGE: &str =
    "Sorry, I couldn't process your question. Please try again.";

pub const BUSY_MESSAGE: &str =
    "Still working on your previous request. Please wait for it to finish.";

pub const ROUTINE_LOADING: &str = "Generating your personalized routine...";

pub const QUESTION_LOADING: &str = "Thinking...";

pub fn routine_prompt(products: &[Product]) -> String {
    let lines = products
        .iter()
        .map(|p| format!("- {} ({}): {}", p.name, p.brand, p.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Create a skincare/beauty routine using these products:\n{}\n\n\
Please provide a step-by-step routine that explains:\n\
1. The order to use these products\n\
2. When to use each product (morning/evening)\n\
3. How to apply each product\n\
4. Any special instructions or precautions\n\n\
Format the response in clear, numbered steps.",
        lines
    )
}
