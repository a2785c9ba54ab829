//! Instruction text for the prediction and simulation requests. The request
//! payload itself travels as a separate JSON part.

use crate::models::allocation::Allocation;

/// Lowest and highest return rate the simulation prompt asks for.
pub const SIMULATION_RATE_RANGE: (f64, f64) = (-0.5, 1.0);

pub fn build_prediction_prompt(allocation: &Allocation, currency: &str, horizon_days: u32) -> String {
    let keys = allocation
        .ids()
        .map(|id| format!("\"{id}\": number"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a financial analyst specializing in cryptocurrency markets.\n\
The user's investment ({currency}) and percentage allocation per asset follow as JSON.\n\
Predict the price change percentage of each allocated asset over the next {horizon_days} days. \
Keep predictions realistic and grounded in current market trends.\n\
Respond with JSON only, in this shape:\n\
{{\"priceChanges\": {{{keys}}}, \"totalProfitLoss\": number, \"percentageChange\": number, \
\"finalValue\": number, \"breakdown\": [{{\"name\": string, \"allocation\": number, \
\"priceChange\": number, \"profitLoss\": number}}], \"thoughts\": string}}\n\
Include every asset in priceChanges. In thoughts, give a 2-3 sentence rationale."
    )
}

pub fn build_simulation_prompt() -> String {
    let (low, high) = SIMULATION_RATE_RANGE;
    format!(
        "Generate the requested number of potential return rates for investment scenarios \
(numberOfScenarios in the JSON that follows). \
Each return rate should be a floating point number between {low} and {high}. \
Respond with JSON only: {{\"scenarios\": [{{\"returnRate\": number}}]}}"
    )
}
