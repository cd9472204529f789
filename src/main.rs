//! # Transcript PDF CLI
//!
//! Usage:
//!   transcript-pdf input.json -o conversation.pdf
//!   echo '[{"role":"user","content":"Hi"}]' | transcript-pdf -o out.pdf
//!   transcript-pdf --example > chat.json
//!   transcript-pdf chat.json --title "Support chat"

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use transcript_pdf::{TranscriptError, TranscriptInput};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_conversation_json());
        return;
    }

    let input_path = args
        .iter()
        .enumerate()
        .skip(1)
        .find(|(i, a)| !a.starts_with('-') && !is_flag_value(&args, *i))
        .map(|(_, a)| a.clone());

    let input = match read_input(input_path.as_deref()) {
        Ok(input) => input,
        Err(e) => fail(&format!("Failed to read input: {}", e)),
    };

    let output_path = flag_value(&args, "-o").unwrap_or_else(|| "conversation.pdf".to_string());
    let title = flag_value(&args, "--title");

    match render(&input, title.as_deref()) {
        Ok(pdf_bytes) => {
            if let Err(e) = fs::write(&output_path, &pdf_bytes) {
                fail(&format!("Failed to write {}: {}", output_path, e));
            }
            eprintln!("✓ Written {} bytes to {}", pdf_bytes.len(), output_path);
        }
        Err(e) => fail(&format!("Failed to render transcript: {}", e)),
    }
}

fn render(json: &str, title: Option<&str>) -> Result<Vec<u8>, TranscriptError> {
    let mut input: TranscriptInput = serde_json::from_str(json)?;
    if let Some(title) = title {
        input = input.with_title(title);
    }
    transcript_pdf::render_input(input)
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn is_flag_value(args: &[String], index: usize) -> bool {
    index > 0 && matches!(args[index - 1].as_str(), "-o" | "--title")
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    process::exit(1);
}

fn example_conversation_json() -> &'static str {
    r##"{
  "metadata": {
    "title": "Conversation Transcript",
    "author": "Support"
  },
  "messages": [
    { "role": "user", "content": "How do I reverse a list in Python?" },
    {
      "role": "assistant",
      "content": "Use **slicing** for a reversed copy: `items[::-1]`. If you want to reverse *in place*, call `items.reverse()` instead."
    },
    { "role": "user", "content": "Which one is faster?" },
    {
      "role": "assistant",
      "content": "`items.reverse()` avoids allocating a new list, so it is usually the better choice when you no longer need the original order."
    }
  ]
}
"##
}
