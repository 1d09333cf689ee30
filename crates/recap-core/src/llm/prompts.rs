//! Fixed instructions and prompt templates for each call site

pub const BULLET_SYSTEM: &str = "You are a helpful assistant. Your role is to extract key information from a transcript of a conversation into a bullet point list. The list items should be actual factual information, or specific opinions expressed, not just records of what was discussed or explored. Always give specifics, instead of referring to vague concepts, objects, or things.";

pub const ESSAY_SYSTEM: &str = "You are a helpful assistant. Your role is to summarize a transcript of a conversation in an essay format. The summary should be an accurate, and complete description of the conversation. It should be a few paragraphs in length. It should not include any information that was not actually discussed. Do not mention the word \"conversation\" or in any way refer to the fact that this is a summary of a conversation.";

pub const TITLE_SYSTEM: &str = "You are a helpful assistant. Your role is to come up with an appropriate title for a given piece of text. The title should be very short, three words or fewer. Your answer should only include the title, and nothing else. Answer in a single line and enclose the title in quotation marks, e.g. \"Title\".";

pub fn keywords_system(count: usize) -> String {
    format!(
        "You are a helpful assistant. Your role is to give a list of {count} keywords that summarize the topics discussed in a given piece of text. The keywords should be given as a numbered list, with each item on a new line. Each keyword must be a single word."
    )
}

pub fn bullet_prompt(fragment: &str) -> String {
    format!(
        "Please provide a bullet point summary of the key ideas and conclusions reached in the following conversation:\n\n{fragment}\n\n"
    )
}

pub fn essay_prompt(bullets: &str) -> String {
    format!("Please write an essay using the following bullet points as a guide:\n\n{bullets}")
}

pub fn title_prompt(text: &str) -> String {
    format!("Please provide a title for the following essay:\n\n{text}")
}

pub fn keywords_prompt(text: &str, vocabulary: &[String], count: usize) -> String {
    format!(
        "Please provide a list of {count} keywords for the following essay:\n\n{text}\n\nEach keyword must be a single word. Here are some existing keywords that are relevant to the user: {}. Include any of these that are relevant to the essay, and add any new keywords that are relevant to the essay.",
        vocabulary.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_prompt_embeds_fragment() {
        let prompt = bullet_prompt("we talked about sourdough");
        assert!(prompt.contains("\n\nwe talked about sourdough\n\n"));
    }

    #[test]
    fn test_keywords_prompt_joins_vocabulary() {
        let vocabulary = vec!["AI".to_string(), "Deep Work".to_string()];
        let prompt = keywords_prompt("essay text", &vocabulary, 5);
        assert!(prompt.starts_with("Please provide a list of 5 keywords"));
        assert!(prompt.contains("relevant to the user: AI; Deep Work."));
    }

    #[test]
    fn test_keywords_system_uses_count() {
        assert!(keywords_system(3).contains("a list of 3 keywords"));
    }
}
