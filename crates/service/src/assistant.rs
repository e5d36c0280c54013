//! Keyword-rule assistant.
//!
//! An ordered list of (keywords, response) rules evaluated top to bottom;
//! the first rule with any keyword contained in the lowercased input wins.
//! Unmatched input gets the fallback response. The canned text is data;
//! the engine is the ordered evaluation.

/// One matching rule: any keyword hit selects the response.
pub struct Rule {
    keywords: &'static [&'static str],
    response: &'static str,
}

impl Rule {
    pub const fn new(keywords: &'static [&'static str], response: &'static str) -> Self {
        Self { keywords, response }
    }

    fn matches(&self, input: &str) -> bool {
        self.keywords.iter().any(|k| input.contains(k))
    }
}

pub struct Assistant {
    rules: Vec<Rule>,
    fallback: &'static str,
}

impl Assistant {
    /// Assistant loaded with the blood-donation knowledge base.
    pub fn new() -> Self {
        knowledge_base()
    }

    /// Assistant with a caller-supplied rule set. Earlier rules shadow
    /// later ones on overlapping keywords.
    pub fn with_rules(rules: Vec<Rule>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    /// First matching rule's response, or the fallback.
    pub fn reply(&self, input: &str) -> &'static str {
        let input = input.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&input))
            .map(|rule| rule.response)
            .unwrap_or(self.fallback)
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new()
    }
}

// Rule order matters: "can i donate" must hit the requirements rule even
// though "donate" also appears in the donation-centers keywords.
fn knowledge_base() -> Assistant {
    let rules = vec![
        Rule::new(
            &["require", "eligibility", "can i donate"],
            "Blood donation requirements: age 17-65, minimum weight 50kg, general \
             good health, no recent illness, not pregnant or breastfeeding, no \
             tattoos or piercings in the last 6 months, healthy hemoglobin levels. \
             Visit any KNBTS center or partner hospital to check your eligibility.",
        ),
        Rule::new(
            &["where", "location", "donate"],
            "Donation centers in Nairobi and Kiambu: Kenyatta National Hospital, \
             MP Shah Hospital, Aga Khan University Hospital, Thika Level 5 Hospital \
             and Kiambu County Referral Hospital. Check the live status page for \
             real-time blood availability.",
        ),
        Rule::new(
            &["blood type", "compatibility"],
            "Blood type compatibility: O- is the universal donor, AB+ the universal \
             recipient. Most common type is O+ (36%), rarest is AB- (1%).",
        ),
        Rule::new(
            &["process", "how to", "steps"],
            "Donation process: registration (5 min), health screening (10 min), \
             donation (10-15 min), rest and refreshments (15 min). Total time is \
             about 45-60 minutes, and one donation can save up to 3 lives.",
        ),
        Rule::new(
            &["emergency", "contact", "call"],
            "Emergency hotline: +254 700 000 000 (24/7). Email: \
             emergency@uhai-damu.co.ke. Nairobi: +254 704 000 004, Kiambu: \
             +254 705 000 005.",
        ),
        Rule::new(
            &["appointment", "schedule", "book"],
            "To schedule a donation: log in, open the live blood bank status page, \
             pick a hospital and choose a date and time. Or call donor services on \
             +254 701 000 001.",
        ),
        Rule::new(
            &["benefit", "why", "good"],
            "Benefits of donating: saves up to 3 lives, includes a free health \
             check-up, reduces iron overload and tells you your blood type.",
        ),
        Rule::new(
            &["side effect", "pain", "feel"],
            "Common side effects are mild bruising, temporary lightheadedness and \
             fatigue that resolves within 24 hours. Drink plenty of fluids, eat \
             iron-rich food and rest for 15-20 minutes afterwards.",
        ),
        Rule::new(
            &["often", "frequent", "times"],
            "Donation frequency: whole blood every 3 months (men) or 4 months \
             (women), platelets every 2 weeks, plasma every 4 weeks, double red \
             cells every 6 months.",
        ),
        Rule::new(
            &["hi", "hello", "hey"],
            "Hello! Welcome to Uhai Damu. I'm your blood donation assistant. How \
             can I help you today?",
        ),
        Rule::new(
            &["thank"],
            "You're welcome! Thank YOU for your interest in saving lives. Is there \
             anything else I can help with?",
        ),
    ];

    Assistant::with_rules(
        rules,
        "I can help with blood donation questions: donation requirements, where \
         to donate, blood types and compatibility, the donation process, \
         emergency contacts and the benefits of donating. What would you like \
         to know?",
    )
}
