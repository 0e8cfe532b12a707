//! Helpers that pull information out of syntax nodes.

mod keywords;

pub use keywords::{get_call_keyword_arguments, get_call_keyword_arguments_with, KeywordArguments};
