use promptsmith_contracts::collections::FewShotExample;
use promptsmith_contracts::models::TargetModel;

use crate::error::ActionError;
use crate::service::{GenerativeService, TextRequest};

pub const OPTIMIZER_TEMPERATURE: f64 = 0.7;
pub const OPTIMIZER_TOP_P: f64 = 0.95;

const EXAMPLES_PREAMBLE: &str = "Here are some examples of how to optimize prompts. Learn from their style, structure, and level of detail:";

pub fn build_system_instruction(models: &[TargetModel], examples: &[FewShotExample]) -> String {
    let model_list = models
        .iter()
        .map(|model| model.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut instruction = format!(
        "You are a world-class expert in prompt engineering for large language models.
Your task is to rewrite a user's prompt to be optimized for the following AI models: {model_list}.

Follow these rules strictly:
1.  Analyze the user's original prompt to understand their core intent.
2.  Enhance the prompt by adding clarity, context, constraints, and a clear desired output format.
3.  Ensure the prompt is structured to elicit the most accurate, detailed, and helpful response from the specified models.
4.  The final output MUST ONLY be the optimized prompt text itself. Do not include any pre-amble, explanations, titles, or markdown formatting like ```. Just return the pure, optimized prompt."
    );
    // Every stored example is sent, including blank ones.
    if !examples.is_empty() {
        instruction.push_str("\n\n");
        instruction.push_str(EXAMPLES_PREAMBLE);
        for (index, example) in examples.iter().enumerate() {
            instruction.push_str(&format!(
                "\n\nExample {}:\nInput: {}\nOutput: {}",
                index + 1,
                example.input,
                example.output
            ));
        }
    }
    instruction
}

pub fn build_optimize_request(
    original_prompt: &str,
    models: &[TargetModel],
    examples: &[FewShotExample],
) -> TextRequest {
    TextRequest {
        prompt: original_prompt.to_string(),
        system_instruction: Some(build_system_instruction(models, examples)),
        temperature: Some(OPTIMIZER_TEMPERATURE),
        top_p: Some(OPTIMIZER_TOP_P),
    }
}

/// One text-generation call; the rewrite comes back trimmed.
pub fn optimize_prompt(
    service: &dyn GenerativeService,
    original_prompt: &str,
    models: &[TargetModel],
    examples: &[FewShotExample],
) -> Result<String, ActionError> {
    let request = build_optimize_request(original_prompt, models, examples);
    log::info!(
        "optimizing prompt for {} model(s) with {} example(s)",
        models.len(),
        examples.len()
    );
    let text = service
        .generate_text(&request)
        .map_err(ActionError::Optimize)?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use promptsmith_contracts::collections::FewShotExample;
    use promptsmith_contracts::models::TargetModel;

    use super::{build_system_instruction, optimize_prompt};
    use crate::error::{error_chain_text, ServiceError};
    use crate::testing::FakeService;

    fn example(id: &str, input: &str, output: &str) -> FewShotExample {
        FewShotExample {
            id: id.to_string(),
            input: input.to_string(),
            output: output.to_string(),
        }
    }

    #[test]
    fn instruction_names_models_in_selection_order() {
        let instruction =
            build_system_instruction(&[TargetModel::ChatGPT, TargetModel::Claude], &[]);
        assert!(instruction.starts_with(
            "You are a world-class expert in prompt engineering for large language models."
        ));
        assert!(instruction
            .contains("optimized for the following AI models: ChatGPT, Claude.\n\nFollow"));
        assert!(instruction.ends_with("Just return the pure, optimized prompt."));
        assert!(!instruction.contains("Here are some examples"));
    }

    #[test]
    fn instruction_lists_every_example_including_blank_ones() {
        let instruction = build_system_instruction(
            &[TargetModel::Gemini],
            &[example("a", "write a poem", "Write a 12-line poem about autumn."), example("b", "", "")],
        );
        assert!(instruction.contains(
            "\n\nHere are some examples of how to optimize prompts. Learn from their style, structure, and level of detail:\n\nExample 1:\nInput: write a poem\nOutput: Write a 12-line poem about autumn."
        ));
        assert!(instruction.ends_with("\n\nExample 2:\nInput: \nOutput: "));
    }

    #[test]
    fn optimize_sends_one_request_and_trims_the_reply() -> anyhow::Result<()> {
        let service = FakeService::new().with_text(Ok("  A clear rewrite.\n".to_string()));
        let optimized = optimize_prompt(
            &service,
            "Explain recursion",
            &[TargetModel::ChatGPT, TargetModel::Claude],
            &[],
        )?;
        assert_eq!(optimized, "A clear rewrite.");

        let requests = service.text_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "Explain recursion");
        assert_eq!(requests[0].temperature, Some(0.7));
        assert_eq!(requests[0].top_p, Some(0.95));
        let instruction = requests[0].system_instruction.clone().unwrap_or_default();
        assert!(instruction.contains("ChatGPT, Claude"));
        Ok(())
    }

    #[test]
    fn service_failure_is_prefixed() {
        let service = FakeService::new().with_text(Err(ServiceError::Status {
            provider: "Gemini",
            status: 500,
            body: "backend unavailable".to_string(),
        }));
        let err = optimize_prompt(&service, "hi", &[TargetModel::Gemini], &[])
            .expect_err("should fail");
        assert_eq!(
            error_chain_text(&err),
            "Failed to optimize prompt: Gemini request failed (500): backend unavailable"
        );
        assert_eq!(service.text_requests().len(), 1);
    }
}
