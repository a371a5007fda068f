use crate::models::{AttributeSet, Breed, CatAge, CatSize, Expression};

fn size_phrase(size: CatSize) -> &'static str {
    match size {
        CatSize::Small => "small, adorable kitten",
        CatSize::Medium => "medium-sized, well-proportioned cat",
        CatSize::Large => "large, fluffy, chonky cat",
        CatSize::VeryLarge => "absolutely massive, legendary chonker cat",
    }
}

fn age_phrase(age: CatAge) -> &'static str {
    match age {
        CatAge::Kitten => "baby kitten (0-3 months old)",
        CatAge::Young => "young cat (3-12 months old)",
        CatAge::Adult => "adult cat (1-7 years old)",
        CatAge::Senior => "senior cat (7+ years old)",
    }
}

fn expression_phrase(expression: Expression) -> &'static str {
    match expression {
        Expression::Happy => "purring happily with contentment",
        Expression::Neutral => "calm and relaxed",
        Expression::Concerned => "slightly worried",
        Expression::Grumpy => "very grumpy and displeased",
    }
}

fn breed_phrase(breed: Breed) -> &'static str {
    match breed {
        Breed::Tabby => "tabby cat with striped fur pattern",
        Breed::Siamese => "siamese cat with blue eyes and colorpoint markings",
        Breed::Persian => "persian cat with luxurious long fur and flat face",
        Breed::MaineCoon => "maine coon cat, large and majestic with tufted ears",
        Breed::ScottishFold => "scottish fold cat with distinctive folded ears",
        Breed::BritishShorthair => "british shorthair cat with plush coat and round face",
        Breed::Ragdoll => "ragdoll cat with blue eyes and calm, relaxed posture",
        Breed::DomesticShorthair => "domestic shorthair cat",
    }
}

/// Grooming adjective for a 0-10 beauty score
pub fn beauty_modifier(score: f64) -> &'static str {
    if score >= 8.0 {
        "beautiful, well-groomed"
    } else if score >= 6.0 {
        "pleasant-looking"
    } else if score >= 4.0 {
        "ordinary"
    } else {
        "scruffy, disheveled"
    }
}

/// Natural-language description handed to the renderer
pub fn describe(attributes: &AttributeSet) -> String {
    format!(
        "A {} {}, {} ({}) with a {} expression. Background: {}. \
         Photorealistic, detailed fur texture, professional photography, 8k quality. \
         The cat should look natural and lifelike.",
        beauty_modifier(attributes.beauty_score),
        age_phrase(attributes.age),
        size_phrase(attributes.size),
        breed_phrase(attributes.breed),
        expression_phrase(attributes.expression),
        attributes.background,
    )
}
