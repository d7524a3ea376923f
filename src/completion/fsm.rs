//! Finite state machine for completion context determination
//!
//! The machine walks the words before the cursor once. A help flag switches
//! it into help mode for the rest of the line; in either mode the last word
//! before the cursor picks the sub-state. The word under the cursor is only
//! looked at when converting the final state into a [`CompletionContext`].

use super::context::CompletionContext;
use super::token_stream::{CommandLine, HELP_FLAGS};

/// FSM states representing different positions in a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// Initial state
    Start,
    /// After `-i` or `-src`
    AfterInputFlag,
    /// After `-o` or `-dst`
    AfterOutputFlag,

    // === Help states ===
    /// A help flag was seen
    Help,
    /// After `-h module` or `-h modules`
    HelpModules,
    /// After `-h links`
    HelpLinks,
    /// After `-h props`
    HelpProps,
}

impl CompletionState {
    /// Perform state transition based on current state and word
    pub fn next(self, word: &str) -> Self {
        use CompletionState::*;

        let in_help = matches!(self, Help | HelpModules | HelpLinks | HelpProps);

        match word {
            w if HELP_FLAGS.contains(&w) => Help,
            "module" | "modules" if in_help => HelpModules,
            "links" if in_help => HelpLinks,
            "props" if in_help => HelpProps,
            _ if in_help => Help,
            "-i" | "-src" => AfterInputFlag,
            "-o" | "-dst" => AfterOutputFlag,
            _ => Start,
        }
    }

    /// Run the FSM on a sequence of words
    pub fn run(words: &[String]) -> Self {
        words
            .iter()
            .fold(CompletionState::Start, |state, word| state.next(word))
    }

    /// Convert state to completion context
    pub fn to_context(self, line: &CommandLine) -> CompletionContext {
        use CompletionState::*;

        let current = line.current_word();
        match self {
            HelpModules => CompletionContext::module(current),
            HelpLinks => CompletionContext::linked_filter(current),
            HelpProps => CompletionContext::property(current),
            Help => CompletionContext::help_topic(current),
            AfterInputFlag => CompletionContext::input_endpoint(current),
            AfterOutputFlag => CompletionContext::output_endpoint(current),
            Start => {
                if let Some(value) = current.strip_prefix("src=") {
                    CompletionContext::input_endpoint(value)
                } else if let Some(value) = current.strip_prefix("dst=") {
                    CompletionContext::output_endpoint(value)
                } else if current.is_empty() {
                    CompletionContext::Start
                } else if current.starts_with('-') {
                    CompletionContext::flag(current)
                } else {
                    CompletionContext::filter_clause(current, line.quote_synthesized)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(line: &str) -> CompletionContext {
        let line = CommandLine::parse(line, line.chars().count());
        CompletionState::run(line.words_before_cursor()).to_context(&line)
    }

    fn state(line: &str) -> CompletionState {
        let line = CommandLine::parse(line, line.chars().count());
        CompletionState::run(line.words_before_cursor())
    }

    #[test]
    fn test_state_start() {
        assert_eq!(state("gpac "), CompletionState::Start);
        assert_eq!(state("gpac inspect "), CompletionState::Start);
    }

    #[test]
    fn test_state_help_is_sticky() {
        assert_eq!(state("gpac -h "), CompletionState::Help);
        assert_eq!(state("gpac -h filters "), CompletionState::Help);
        assert_eq!(state("gpac -h -i "), CompletionState::Help);
    }

    #[test]
    fn test_state_help_keywords() {
        assert_eq!(state("gpac -h module "), CompletionState::HelpModules);
        assert_eq!(state("gpac -hx modules "), CompletionState::HelpModules);
        assert_eq!(state("gpac -h links "), CompletionState::HelpLinks);
        assert_eq!(state("gpac -h props "), CompletionState::HelpProps);
        assert_eq!(state("gpac -h module gm_alsa.so "), CompletionState::Help);
    }

    #[test]
    fn test_state_keywords_need_help() {
        assert_eq!(state("gpac props "), CompletionState::Start);
    }

    #[test]
    fn test_state_endpoint_flags() {
        assert_eq!(state("gpac -i "), CompletionState::AfterInputFlag);
        assert_eq!(state("gpac -src "), CompletionState::AfterInputFlag);
        assert_eq!(state("gpac -o "), CompletionState::AfterOutputFlag);
        assert_eq!(state("gpac -dst "), CompletionState::AfterOutputFlag);
        assert_eq!(state("gpac -i in.mp4 "), CompletionState::Start);
    }

    #[test]
    fn test_context_from_current_word() {
        assert_eq!(context("gpac "), CompletionContext::Start);
        assert_eq!(context(""), CompletionContext::Start);
        assert_eq!(context("gpac -st"), CompletionContext::flag("-st"));
        assert_eq!(
            context("gpac fin:src=ht"),
            CompletionContext::filter_clause("fin:src=ht", false)
        );
        assert_eq!(context("gpac src=ht"), CompletionContext::input_endpoint("ht"));
        assert_eq!(context("gpac dst="), CompletionContext::output_endpoint(""));
        assert_eq!(
            context("gpac inspect:fmt=\"a"),
            CompletionContext::filter_clause("inspect:fmt=\"a\"", true)
        );
    }

    #[test]
    fn test_context_help() {
        assert_eq!(context("gpac -h jsf"), CompletionContext::help_topic("jsf"));
        assert_eq!(context("gpac -h props Da"), CompletionContext::property("Da"));
        assert_eq!(context("gpac -h module "), CompletionContext::module(""));
        assert_eq!(context("gpac -h links "), CompletionContext::linked_filter(""));
    }

    #[test]
    fn test_context_endpoint() {
        assert_eq!(context("gpac -o r"), CompletionContext::output_endpoint("r"));
        assert_eq!(context("gpac -src "), CompletionContext::input_endpoint(""));
    }
}
