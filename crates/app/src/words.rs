use vocab_core::model::{ItemId, Tier, VocabItem};

/// Built-in Spanish practice list used when no catalog file is given.
#[must_use]
pub fn builtin() -> Vec<VocabItem> {
    const WORDS: &[(&str, &str, &str, Tier)] = &[
        // everyday basics
        ("dog", "dog", "perro", Tier::Easy),
        ("cat", "cat", "gato", Tier::Easy),
        ("house", "house", "casa", Tier::Easy),
        ("water", "water", "agua", Tier::Easy),
        ("bread", "bread", "pan", Tier::Easy),
        ("sun", "sun", "sol", Tier::Easy),
        ("moon", "moon", "luna", Tier::Easy),
        ("book", "book", "libro", Tier::Easy),
        ("friend", "friend", "amigo", Tier::Easy),
        ("milk", "milk", "leche", Tier::Easy),
        ("red", "red", "rojo", Tier::Easy),
        ("night", "night", "noche", Tier::Easy),
        // common but less immediate
        ("window", "window", "ventana", Tier::Medium),
        ("kitchen", "kitchen", "cocina", Tier::Medium),
        ("to travel", "to travel", "viajar", Tier::Medium),
        ("to remember", "to remember", "recordar", Tier::Medium),
        ("city", "city", "ciudad", Tier::Medium),
        ("weather", "weather", "tiempo", Tier::Medium),
        ("breakfast", "breakfast", "desayuno", Tier::Medium),
        ("library", "library", "biblioteca", Tier::Medium),
        ("shoe", "shoe", "zapato", Tier::Medium),
        ("to answer", "to answer", "contestar", Tier::Medium),
        // trickier vocabulary
        ("development", "development", "desarrollo", Tier::Hard),
        ("to achieve", "to achieve", "lograr", Tier::Hard),
        ("knowledge", "knowledge", "conocimiento", Tier::Hard),
        ("to improve", "to improve", "mejorar", Tier::Hard),
        ("behavior", "behavior", "comportamiento", Tier::Hard),
        ("threat", "threat", "amenaza", Tier::Hard),
        ("to succeed", "to succeed", "tener éxito", Tier::Hard),
        ("average", "average", "promedio", Tier::Hard),
    ];

    WORDS
        .iter()
        .map(|(id, source, target, tier)| {
            VocabItem::new(ItemId::new(*id), *source, *target, *tier)
        })
        .collect()
}
