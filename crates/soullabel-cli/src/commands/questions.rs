use std::path::Path;

use super::load_config;

pub fn run(path: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let data = config.quiz_data()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if !data.title.is_empty() {
        println!("{}\n", data.title);
    }
    for (i, question) in data.questions.iter().enumerate() {
        println!("{}. {}", i + 1, question.text);
        for option in &question.options {
            println!("   [{}] {}", option.id, option.text);
        }
    }
    println!("\nPossible results:");
    for tag in &data.tags {
        println!("  - {tag}");
    }
    Ok(())
}
