use crate::constants::models;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tiktoken_rs::CoreBPE;

/// How text is counted for a particular model.
enum Tokenizer {
    Bpe(CoreBPE),
    /// Whitespace-delimited words; used when no BPE table could be loaded.
    Words,
}

/// Token counting and tail-preserving truncation, per model.
///
/// Resolution for a model is: its own BPE table, then the generic
/// `cl100k_base` table, then plain word counting. The resolved tokenizer is
/// cached so repeated calls for the same model stay cheap and consistent.
pub struct TokenBudgeter {
    cache: Mutex<HashMap<String, Arc<Tokenizer>>>,
}

impl TokenBudgeter {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Context window (input + output) for `model`. Unknown models get the
    /// smallest known window.
    pub fn budget(&self, model: &str) -> usize {
        context_window(model)
    }

    pub fn estimate(&self, text: &str, model: &str) -> usize {
        let tokenizer = self.tokenizer_for(model);
        count(&tokenizer, text)
    }

    /// Keeps the most recent `max_tokens` tokens of `text`, dropping from the head.
    pub fn truncate(&self, text: &str, model: &str, max_tokens: usize) -> String {
        if max_tokens == 0 {
            return String::new();
        }
        let tokenizer = self.tokenizer_for(model);
        match tokenizer.as_ref() {
            Tokenizer::Bpe(bpe) => {
                if bpe.encode_with_special_tokens(text).len() <= max_tokens {
                    return text.to_string();
                }
                match truncate_tokens(bpe, text, max_tokens) {
                    Some(tail) => tail,
                    None => {
                        tracing::debug!(model, "token-level truncation failed, dropping whole words");
                        truncate_words(&tokenizer, text, max_tokens)
                    }
                }
            }
            Tokenizer::Words => truncate_words(&tokenizer, text, max_tokens),
        }
    }

    fn tokenizer_for(&self, model: &str) -> Arc<Tokenizer> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(t) = cache.get(model) {
            return t.clone();
        }
        let tokenizer = Arc::new(resolve(model));
        cache.insert(model.to_string(), tokenizer.clone());
        tokenizer
    }
}

impl Default for TokenBudgeter {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(model: &str) -> Tokenizer {
    if let Ok(bpe) = tiktoken_rs::get_bpe_from_model(model) {
        return Tokenizer::Bpe(bpe);
    }
    match tiktoken_rs::cl100k_base() {
        Ok(bpe) => Tokenizer::Bpe(bpe),
        Err(e) => {
            tracing::warn!(model, error = %e, "no BPE tokenizer available, counting words");
            Tokenizer::Words
        }
    }
}

fn count(tokenizer: &Tokenizer, text: &str) -> usize {
    match tokenizer {
        Tokenizer::Bpe(bpe) => bpe.encode_with_special_tokens(text).len(),
        Tokenizer::Words => text.split_whitespace().count(),
    }
}

/// Decodes the last `max_tokens` tokens, shrinking the window if the decoded
/// text re-encodes to more than the limit. Returns `None` when the tail does
/// not decode (e.g. it starts inside a multi-byte character).
fn truncate_tokens(bpe: &CoreBPE, text: &str, max_tokens: usize) -> Option<String> {
    let tokens = bpe.encode_with_special_tokens(text);
    let mut keep = max_tokens.min(tokens.len());
    while keep > 0 {
        let tail = tokens[tokens.len() - keep..].to_vec();
        let text = bpe.decode(tail).ok()?;
        if bpe.encode_with_special_tokens(&text).len() <= max_tokens {
            return Some(text);
        }
        keep -= 1;
    }
    Some(String::new())
}

/// Keeps the longest run of trailing words whose count fits in `max_tokens`.
fn truncate_words(tokenizer: &Tokenizer, text: &str, max_tokens: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let join_tail = |k: usize| words[words.len() - k..].join(" ");

    if let Tokenizer::Words = tokenizer {
        return join_tail(max_tokens.min(words.len()));
    }

    // Largest k such that the last k words fit.
    let (mut lo, mut hi) = (0usize, words.len());
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        if count(tokenizer, &join_tail(mid)) <= max_tokens {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    join_tail(lo)
}

fn context_window(model: &str) -> usize {
    if let Some((_, window)) = models::CONTEXT_WINDOWS.iter().find(|(id, _)| *id == model) {
        return *window;
    }
    models::CONTEXT_WINDOWS
        .iter()
        .filter(|(id, _)| model.starts_with(id))
        .max_by_key(|(id, _)| id.len())
        .map(|(_, window)| *window)
        .unwrap_or(models::FALLBACK_CONTEXT_WINDOW)
}
