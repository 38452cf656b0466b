//! Random placeholder sentences used as commit messages.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Prefix of every message the `work` flow commits.
pub const COMMIT_PREFIX: &str = ":rocket: feat: ";

/// Target word count for `work` messages.
pub const COMMIT_WORDS: usize = 6;

/// Target word count for `push` messages.
pub const PLAIN_WORDS: usize = 8;

/// How far a sentence may stray from its target word count, as a fraction.
const WORD_VARIANCE: f64 = 0.4;

/// Built-in lorem ipsum pool the sentences are drawn from.
const WORD_POOL: &[&str] = &[
    "a", "ab", "accusamus", "ad", "adipisci", "alias", "aliquam", "amet", "animi", "aperiam",
    "architecto", "asperiores", "aspernatur", "assumenda", "at", "atque", "aut", "autem",
    "beatae", "blanditiis", "commodi", "consectetur", "consequatur", "corporis", "corrupti",
    "culpa", "cum", "cumque", "cupiditate", "debitis", "delectus", "deleniti", "deserunt",
    "dicta", "dignissimos", "distinctio", "dolor", "dolore", "dolorem", "doloremque",
    "dolores", "doloribus", "dolorum", "ducimus", "ea", "eaque", "earum", "eius", "eligendi",
    "enim", "eos", "error", "esse", "est", "et", "eum", "eveniet", "ex", "excepturi",
    "exercitationem", "expedita", "explicabo", "facere", "facilis", "fuga", "fugiat",
    "fugit", "harum", "hic", "id", "illo", "illum", "impedit", "in", "incidunt", "inventore",
    "ipsa", "ipsam", "ipsum", "iste", "itaque", "iure", "iusto", "labore", "laboriosam",
    "laborum", "laudantium", "libero", "magnam", "magni", "maiores", "maxime", "minima",
    "minus", "modi", "molestiae", "molestias", "mollitia", "nam", "natus", "necessitatibus",
    "nemo", "neque", "nesciunt", "nihil", "nisi", "nobis", "non", "nostrum", "nulla",
    "numquam", "obcaecati", "odio", "odit", "officia", "officiis", "omnis", "optio",
    "pariatur", "perferendis", "perspiciatis", "placeat", "porro", "possimus", "praesentium",
    "provident", "quae", "quaerat", "quam", "quas", "quasi", "qui", "quia", "quibusdam",
    "quidem", "quis", "quisquam", "quo", "quod", "quos", "ratione", "recusandae",
    "reiciendis", "rem", "repellat", "repellendus", "reprehenderit", "repudiandae", "rerum",
    "saepe", "sapiente", "sed", "sequi", "similique", "sint", "sit", "soluta", "sunt",
    "suscipit", "tempora", "tempore", "temporibus", "tenetur", "totam", "ullam", "unde",
    "ut", "vel", "velit", "veniam", "veritatis", "vero", "vitae", "voluptas", "voluptate",
    "voluptatem", "voluptates", "voluptatibus", "voluptatum",
];

/// Draw a sentence of roughly `nb_words` words, capitalised and ending with a full stop.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, nb_words: usize) -> String {
    let count = word_count(rng, nb_words);
    let words: Vec<&str> = (0..count)
        .map(|_| *WORD_POOL.choose(rng).unwrap_or(&"lorem"))
        .collect();

    let mut sentence = capitalize(&words.join(" "));
    sentence.push('.');
    sentence
}

/// Messages for the `work` flow, each carrying [`COMMIT_PREFIX`].
pub fn commit_messages<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| format!("{}{}", COMMIT_PREFIX, sentence(rng, COMMIT_WORDS)))
        .collect()
}

/// Bare sentences for the `push` flow.
pub fn plain_messages<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    (0..count).map(|_| sentence(rng, PLAIN_WORDS)).collect()
}

fn word_count<R: Rng + ?Sized>(rng: &mut R, nb_words: usize) -> usize {
    let low = ((nb_words as f64) * (1.0 - WORD_VARIANCE)) as usize;
    let high = ((nb_words as f64) * (1.0 + WORD_VARIANCE)) as usize;
    rng.random_range(low.max(1)..=high.max(1))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
