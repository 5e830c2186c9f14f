//! Builders for the Notion block objects making up a Q&A page body.

use serde_json::{json, Value};

use crate::qna::StructuredAnswer;

pub fn paragraph(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": {
            "rich_text": [{ "type": "text", "text": { "content": text } }]
        }
    })
}

pub fn divider() -> Value {
    json!({ "object": "block", "type": "divider", "divider": {} })
}

/// Questions are often pasted with meaningful line breaks; a plain-text
/// code block preserves them literally.
pub fn literal(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "code",
        "code": {
            "language": "plain text",
            "rich_text": [{ "type": "text", "text": { "content": text } }]
        }
    })
}

pub fn external_image(url: &str) -> Value {
    json!({
        "object": "block",
        "type": "image",
        "image": { "type": "external", "external": { "url": url } }
    })
}

/// Stand-in recorded when an image could not be uploaded, so the page still
/// names what was attached.
pub fn upload_failed_placeholder(file_name: &str) -> Value {
    paragraph(&format!("📎 Attached image (upload failed): {file_name}"))
}

/// Fixed page body order: question, uploaded images, then the answer, exam
/// tips, and common traps as divider-separated sections with a closing
/// divider. Tips and traps each render as one block, lines joined by
/// newlines in input order.
pub fn assemble(answer: &StructuredAnswer, image_blocks: Vec<Value>) -> Vec<Value> {
    let mut blocks = vec![literal(&answer.question)];
    blocks.extend(image_blocks);
    blocks.push(divider());
    blocks.push(paragraph(&answer.answer));
    blocks.push(divider());
    blocks.push(paragraph(&answer.exam_tips.join("\n")));
    blocks.push(divider());
    blocks.push(paragraph(&answer.common_traps.join("\n")));
    blocks.push(divider());
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_answer() -> StructuredAnswer {
        StructuredAnswer {
            question: "What is a VPC?\n(multi-line)".to_string(),
            title: "VPC basics".to_string(),
            answer: "A logically isolated network.".to_string(),
            exam_tips: vec!["- tip one".to_string(), "- tip two".to_string(), "- tip three".to_string()],
            common_traps: vec!["- trap one".to_string(), "- trap two".to_string()],
            tags: vec!["VPC".to_string(), "Networking".to_string()],
        }
    }

    fn block_types(blocks: &[Value]) -> Vec<&str> {
        blocks.iter().map(|b| b["type"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_assembly_without_images_has_four_dividers() {
        let blocks = assemble(&sample_answer(), Vec::new());

        let dividers = blocks.iter().filter(|b| b["type"] == "divider").count();
        assert_eq!(dividers, 4);
        assert_eq!(
            block_types(&blocks),
            vec![
                "code", "divider", "paragraph", "divider", "paragraph", "divider",
                "paragraph", "divider"
            ]
        );
    }

    #[test]
    fn test_question_block_preserves_line_breaks() {
        let blocks = assemble(&sample_answer(), Vec::new());
        assert_eq!(
            blocks[0]["code"]["rich_text"][0]["text"]["content"],
            "What is a VPC?\n(multi-line)"
        );
    }

    #[test]
    fn test_tips_and_traps_join_as_single_blocks() {
        let blocks = assemble(&sample_answer(), Vec::new());

        assert_eq!(
            blocks[4]["paragraph"]["rich_text"][0]["text"]["content"],
            "- tip one\n- tip two\n- tip three"
        );
        assert_eq!(
            blocks[6]["paragraph"]["rich_text"][0]["text"]["content"],
            "- trap one\n- trap two"
        );
    }

    #[test]
    fn test_image_blocks_sit_between_question_and_first_divider() {
        let images = vec![
            external_image("https://i.ibb.co/abc/one.png"),
            upload_failed_placeholder("two.png"),
        ];
        let blocks = assemble(&sample_answer(), images);

        assert_eq!(blocks[0]["type"], "code");
        assert_eq!(blocks[1]["type"], "image");
        assert_eq!(
            blocks[2]["paragraph"]["rich_text"][0]["text"]["content"]
                .as_str()
                .unwrap(),
            "📎 Attached image (upload failed): two.png"
        );
        assert_eq!(blocks[3]["type"], "divider");
    }
}
