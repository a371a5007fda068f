use crate::models::{Breed, CatSize};

pub const DEFAULT_BACKGROUND: &str =
    "a generic code editor with colorful syntax highlighting and binary matrix";

pub const LANGUAGE_BACKGROUNDS: &[(&str, &str)] = &[
    ("Python", "snakes and code snippets in a cozy den"),
    ("JavaScript", "coffee cups and scattered npm packages on a laptop desk"),
    ("TypeScript", "organized coffee cups with a blue bow tie and type annotations"),
    ("Java", "coffee beans and enterprise office buildings with glass windows"),
    ("C#", ".NET framework symbols and Windows logos on a modern workspace"),
    ("C++", "circuit boards and low-level hardware with pointers and wires"),
    ("C", "memory chips and pointer diagrams on vintage computer hardware"),
    ("Go", "gophers running playfully through scenic mountains"),
    ("Rust", "gears, a friendly orange crab named Ferris, and metal safety equipment"),
    ("PHP", "purple elephants and web servers with code scrolls"),
    ("Ruby", "sparkling red gems scattered on polished railway tracks"),
    ("Swift", "elegant bird feathers and sleek iOS devices in a modern studio"),
    ("Kotlin", "friendly Android robots climbing colorful mountains"),
    ("Perl", "wise camels carrying ancient scrolls through desert landscapes"),
    ("Scala", "elegant marble staircases ascending toward JVM clouds"),
    ("Haskell", "lambda symbols and complex mathematical equations on chalkboards"),
    ("Elixir", "mystical potion bottles and alchemy symbols in a magical workshop"),
    ("Clojure", "colorful nested parentheses forming beautiful fractal patterns"),
    ("Lua", "crescent moon and glowing stars in a peaceful night sky"),
    ("R", "statistical graphs and colorful data charts on scientific displays"),
    ("Dart", "delicate Flutter butterflies around vibrant mobile app screens"),
    ("Shell", "terminal windows with green text on black screens"),
    ("Bash", "command prompts and cascading shell scripts in a terminal"),
    ("Objective-C", "classic Apple logos and legacy code blueprints from the past"),
    ("F#", "functional programming pipes and .NET symbols in harmony"),
    ("Erlang", "telephone switches and distributed network diagrams"),
    ("Groovy", "musical notes and Gradle build scripts dancing together"),
    ("Crystal", "sparkling crystal shards and high-performance gemstones"),
];

/// Inclusive `[min, max]` repository size ranges in KB
pub const SIZE_RANGES: &[(CatSize, u64, u64)] = &[
    (CatSize::Small, 0, 1000),
    (CatSize::Medium, 1001, 5000),
    (CatSize::Large, 5001, 10_000),
    (CatSize::VeryLarge, 10_001, 999_999),
];

pub(super) const BREED_FAMILIES: &[(Breed, &[&str])] = &[
    (
        Breed::Tabby,
        &["Python", "Ruby", "Perl", "PHP", "Shell", "Bash", "Lua"],
    ),
    (
        Breed::Siamese,
        &["JavaScript", "TypeScript", "Dart", "CoffeeScript"],
    ),
    (Breed::Persian, &["Java", "C#", "Scala", "Kotlin", "F#"]),
    (Breed::MaineCoon, &["Go", "Rust", "C++", "C", "Zig"]),
    (
        Breed::ScottishFold,
        &["Haskell", "Elixir", "Clojure", "Erlang", "OCaml"],
    ),
    (Breed::BritishShorthair, &["Swift", "Objective-C"]),
    (Breed::Ragdoll, &["R", "MATLAB", "Julia"]),
];
