use std::io::{self, Write};

use uniregex::{Regex, RegexOptions};

fn prompt(label: &str) -> Option<String> {
    print!("{label}> ");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Options given as `name,name,...` after the pattern, separated by a tab.
fn parse_options(names: &str) -> Result<RegexOptions, String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .try_fold(RegexOptions::NONE, |options, name| {
            RegexOptions::from_name(&name.to_ascii_uppercase())
                .map(|flag| options | flag)
                .ok_or_else(|| format!("unknown option '{name}'"))
        })
}

fn main() {
    println!("uniregex REPL");
    println!("Type a pattern, optionally followed by a tab and options (e.g. IGNORE_CASE,LATIN1).");
    println!("Type an empty pattern to exit.");

    while let Some(line) = prompt("regex") {
        if line.is_empty() {
            break;
        }
        let (pattern, options) = line.split_once('\t').unwrap_or((line.as_str(), ""));
        let options = match parse_options(options) {
            Ok(options) => options,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        let regex = match Regex::with_options(pattern, options) {
            Ok(regex) => regex,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        println!("Type return to go back to the regex prompt.");
        while let Some(input) = prompt("input") {
            if input == "return" {
                break;
            }
            let mut matches = match regex.find_all(&input) {
                Ok(matches) => matches,
                Err(e) => {
                    println!("{e}");
                    continue;
                }
            };
            for m in &mut matches {
                println!("Match at {} (length {}): {:?}", m.index(), m.len(), m.value());
                for (i, group) in m.groups().iter().enumerate().skip(1) {
                    if group.success() {
                        println!("  Group {i} at {}: {:?}", group.index(), group.value());
                    } else {
                        println!("  Group {i}: None");
                    }
                }
            }
            if matches.produced().is_empty() {
                println!("No match.");
            }
        }
    }
}
