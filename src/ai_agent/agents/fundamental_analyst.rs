use std::sync::Arc;

use crate::ai_agent::llm::model_provider::{ChatMessage, LLMChatter, LLMModelConfig, LLMResponse, ServiceError};
use crate::ai_agent::utils::parameters::{OVERALL_SCORE_KEY, SCORING_PARAMETERS};

/// Generation stops at the first blank line so only the dictionary comes back.
pub const STOP_SEQUENCE: &str = "\n\n";

pub fn build_prompt(stock: &str) -> String {
  let mut table : String = String::new();
  for (index, parameter) in SCORING_PARAMETERS.iter().enumerate() {
    table.push_str(&format!("{:<3} {:<29} {:<8} {}\n",
      format!("{}.", index + 1), parameter.label, format!("{}%", parameter.weight), parameter.description));
  }

  let weights : String = SCORING_PARAMETERS.iter()
    .map(|parameter| format!("{}%", parameter.weight))
    .collect::<Vec<String>>()
    .join(", ");

  format!(r#"Do a fundamental analysis of {stock} and assign a score out of 10 for each of the following parameters.
Be truthful in analysis, no sugarcoating, only Truth.

Return the final scores **only** as a valid Python dictionary. Each parameter must be scored out of 10.

Scoring Table:
No. Parameter                     Weight   Description
{table}
Instructions:
- No explanations or extra commentary.
- Respond with only the dictionary. No extra characters.
- Include an additional key at the end: "{overall}"
- Use this formula for **{overall}**:
  **{overall} = Σ (parameter_score × weight)**
  (Weights: {weights})
"#, stock = stock, table = table, overall = OVERALL_SCORE_KEY, weights = weights)
}

pub struct FundamentalAnalyst {
  client: Arc<dyn LLMChatter>,
  model_config: LLMModelConfig,
}

impl FundamentalAnalyst {

  pub fn new(client: Arc<dyn LLMChatter>, model_name: &str) -> Self {
    let model_config : LLMModelConfig = LLMModelConfig {
      model_name: model_name.to_string(),
      temperature: Some(0.0),
      max_tokens: None,
      stop: Some(vec![STOP_SEQUENCE.to_string()]),
    };
    FundamentalAnalyst { client, model_config }
  }

  /// One completion call for `stock`; the reply text is returned untouched.
  pub async fn analyze(&self, stock: &str) -> Result<String, ServiceError> {
    let messages = vec![ChatMessage::user(build_prompt(stock))];

    log::info!("[Fundamental Analyst] ({}) Calling {} for fundamental scores...", stock, self.model_config.model_name);
    let response : LLMResponse = self.client.chat(messages, &self.model_config).await?;
    log::debug!("[Fundamental Analyst] ({}) LLM raw response: {}", stock, response.content);

    return Ok(response.content);
  }
}
