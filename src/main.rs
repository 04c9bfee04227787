use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tedscribe::cli::{Cli, Commands, HttpOptions};
use tedscribe::config::Config;
use tedscribe::extractor::TalkExtractor;
use tedscribe::model::Talk;
use tedscribe::text::DEFAULT_WORDS_PER_MINUTE;
use tedscribe::{output, utils};

fn main() -> Result<()> {
    // The pipeline is strictly sequential; a single-threaded runtime makes
    // that explicit.
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "tedscribe=debug"
    } else {
        "tedscribe=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Extract {
            url,
            output,
            format,
            preview,
            http,
        } => {
            let config = apply_http_options(config, http);
            let extractor = TalkExtractor::new(&config)?;

            println!("Extracting transcript from: {}", url);
            let talk = extractor.extract_single(&url).await;

            if !talk.success {
                println!(
                    "FAILED: {}",
                    talk.error_message.as_deref().unwrap_or("unknown error")
                );
                std::process::exit(1);
            }

            print_talk_summary(&talk);

            if preview {
                println!("\n--- Transcript Preview ---");
                println!("{}", transcript_preview(&talk.transcript, 500));
            }

            match output {
                Some(path) => {
                    output::save_to_file(std::slice::from_ref(&talk), &path, &format)?;
                    println!("Results saved to: {}", path.display());
                }
                None if !preview => output::print_to_console(&[talk], &format)?,
                None => {}
            }
        }

        Commands::Batch {
            file,
            output,
            format,
            http,
        } => {
            let config = apply_http_options(config, http);

            let content = fs_err::read_to_string(&file)?;
            let urls = collect_urls(&content);
            if urls.is_empty() {
                anyhow::bail!("no valid TED talk URLs found in {}", file.display());
            }
            println!("Found {} TED talk URLs", urls.len());

            let extractor = TalkExtractor::new(&config)?;

            let progress = if cli.quiet {
                None
            } else {
                let bar = ProgressBar::new(urls.len() as u64);
                bar.set_style(
                    ProgressStyle::with_template(
                        "[{pos}/{len}] {bar:30.cyan/blue} {msg}",
                    )
                    .expect("static template"),
                );
                Some(bar)
            };

            let callback = progress.clone().map(|bar| {
                move |_done: usize, _total: usize, talk: &Talk| {
                    bar.set_message(if talk.success {
                        format!("OK {}", talk.url)
                    } else {
                        format!("FAILED {}", talk.url)
                    });
                    bar.inc(1);
                }
            });

            let talks = match &callback {
                Some(cb) => extractor.extract_batch(&urls, Some(cb)).await,
                None => extractor.extract_batch(&urls, None).await,
            };

            if let Some(bar) = progress {
                bar.finish_and_clear();
            }

            let successful = talks.iter().filter(|t| t.success).count();
            println!("\nBatch extraction completed:");
            println!("  Total: {}", talks.len());
            println!("  Successful: {}", successful);
            println!("  Failed: {}", talks.len() - successful);

            match output {
                Some(path) => {
                    output::save_to_file(&talks, &path, &format)?;
                    println!("Results saved to: {}", path.display());
                }
                None => output::print_to_console(&talks, &format)?,
            }
        }

        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.save()?;
                println!("Configuration written to: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn apply_http_options(config: Config, http: HttpOptions) -> Config {
    config.with_overrides(http.delay, http.timeout, http.retries, http.user_agent)
}

/// Pull talk URLs out of a batch file: one per line, `#` comments and blanks
/// skipped, free-text lines harvested for embedded links. Order-preserving
/// dedup.
fn collect_urls(content: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let found = match utils::validate_talk_url(line) {
            Ok(url) => vec![url.to_string()],
            Err(_) => utils::find_talk_urls(line),
        };
        for url in found {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
    }

    urls
}

fn print_talk_summary(talk: &Talk) {
    println!(
        "SUCCESS: Extracted transcript ({} characters)",
        talk.transcript.len()
    );
    println!("Title: {}", talk.title);
    println!("Speaker: {}", talk.speaker);
    if let Some(duration) = talk.duration_seconds {
        println!("Duration: {}", utils::format_duration(duration));
    }
    if let Some(views) = talk.views {
        println!("Views: {}", views);
    }
    println!(
        "Words: {} (~{:.1} min reading time)",
        talk.word_count,
        talk.reading_time_minutes(DEFAULT_WORDS_PER_MINUTE)
    );
}

fn transcript_preview(transcript: &str, max_chars: usize) -> String {
    if transcript.chars().count() <= max_chars {
        return transcript.to_string();
    }
    let cut: String = transcript.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_urls_skips_comments_and_dedups() {
        let content = "\
# research set
https://www.ted.com/talks/talk_one

see also https://ted.com/talks/talk_two in this article
https://www.ted.com/talks/talk_one?utm_source=share
not a url at all
";
        let urls = collect_urls(content);
        assert_eq!(
            urls,
            vec![
                "https://www.ted.com/talks/talk_one".to_string(),
                "https://www.ted.com/talks/talk_two".to_string(),
            ]
        );
    }

    #[test]
    fn test_transcript_preview_truncates() {
        assert_eq!(transcript_preview("short", 500), "short");

        let long = "a".repeat(600);
        let preview = transcript_preview(&long, 500);
        assert_eq!(preview.len(), 503);
        assert!(preview.ends_with("..."));
    }
}
