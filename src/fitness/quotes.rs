use rand::seq::SliceRandom;

pub static QUOTES: &[&str] = &[
    "Small steps every day lead to big results. 💪",
    "Don’t stop when you’re tired. Stop when you’re done. 🔥",
    "Your body can stand almost anything. It’s your mind you have to convince.",
    "Push yourself because no one else is going to do it for you.",
    "Success starts with self-discipline.",
    "A one-hour workout is just 4% of your day.",
    "The pain you feel today will be the strength you feel tomorrow.",
    "Fitness is not about being better than someone else. It’s about being better than you used to be.",
    "Wake up. Work out. Look hot. Kick ass.",
    "Sweat is just fat crying. 😄",
    "No matter how slow you go, you are still lapping everyone on the couch.",
    "Train insane or remain the same.",
    "You don’t have to be extreme, just consistent.",
    "The body achieves what the mind believes.",
    "Exercise is a celebration of what your body can do.",
    "Once you see results, it becomes an addiction.",
    "Don’t wish for it. Work for it.",
    "Your only limit is you.",
    "Strong body. Strong mind.",
    "Fitness is a lifestyle, not a temporary fix.",
    "Every workout counts.",
    "The hardest lift is lifting yourself off the couch.",
    "Strive for progress, not perfection.",
    "When you feel like quitting, remember why you started.",
    "Sweat now, shine later.",
    "Fall in love with taking care of your body.",
    "You are stronger than you think.",
    "Make your body your strongest outfit.",
    "Discipline is choosing between what you want now and what you want most.",
    "Today’s effort is tomorrow’s confidence.",
    "Your future self will thank you.",
    "Be stronger than your excuses.",
    "Health is an investment, not an expense.",
    "If it doesn’t challenge you, it doesn’t change you.",
    "Workout because you love your body, not because you hate it.",
    "A fit body, a calm mind, a fulfilled soul.",
    "One workout at a time.",
    "Excuses don’t burn calories.",
    "Fitness builds confidence.",
    "Consistency beats motivation.",
    "Your body hears everything your mind says.",
    "Strong habits create strong lives.",
    "Movement is medicine.",
    "Push harder than yesterday if you want a different tomorrow.",
    "Sweat is your body’s way of thanking you.",
    "The best project you’ll ever work on is you.",
    "Fitness is earned, not given.",
    "Believe in your strength.",
    "Every step forward counts.",
];

/// One quote, drawn uniformly at random on every call.
pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Every step forward counts.")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn quotes_are_unique_and_non_empty() {
        assert!(!QUOTES.is_empty());
        let distinct: HashSet<_> = QUOTES.iter().collect();
        assert_eq!(distinct.len(), QUOTES.len());
        assert!(QUOTES.iter().all(|q| !q.trim().is_empty()));
    }

    #[test]
    fn draws_come_from_the_list_and_vary() {
        let seen: HashSet<&str> = (0..1000).map(|_| random_quote()).collect();
        assert!(seen.len() > 1);
        assert!(seen.iter().all(|q| QUOTES.contains(q)));
    }
}
