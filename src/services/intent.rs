//! Keyword-based intent routing for the in-app assistant.
//!
//! A rule matches when any of its keywords appears as a substring of the
//! lowercased input; the first matching rule wins. Keywords overlap across
//! rules (e.g. "repair" belongs to auto, tech and window rules), so the
//! declaration order below is the tie break and must stay an ordered slice,
//! never a map.

pub struct IntentRule {
    pub keywords: &'static [&'static str],
    pub response: &'static str,
}

pub const FALLBACK_RESPONSE: &str = "I didn’t find a match for your request. 🤔 Try describing what kind of service you need (like \"cleaning\", \"gardening\", or \"electrical work\") and include your location so I can guide you better.";

pub const RULES: &[IntentRule] = &[
    IntentRule {
        keywords: &["plumber", "leak", "sink"],
        response: "It sounds like you need plumbing services. 🛠️ You can search for a licensed plumber in your city through the platform. Make sure to describe the issue (e.g. \"leaking sink in the kitchen\") and your location for quicker help.",
    },
    IntentRule {
        keywords: &["electric", "outlet", "socket", "wiring"],
        response: "For electrical problems like faulty outlets or wiring, look for a certified electrician in your area. ⚡ Include the issue and city so pros can assist you better.",
    },
    IntentRule {
        keywords: &["clean", "dust", "maid"],
        response: "Need help cleaning? 🧼 You can hire local cleaners for one-time or recurring services. Describe the job (e.g. apartment cleaning, 2 bedrooms) and your city to get matched.",
    },
    IntentRule {
        keywords: &["garden", "lawn", "tree", "landscape"],
        response: "For lawn care, tree trimming, or garden makeovers 🌱, search for gardeners or landscapers nearby. Mention the work needed and your city to receive estimates.",
    },
    IntentRule {
        keywords: &["carpenter", "furniture", "wood", "cabinet"],
        response: "If you're building or fixing furniture, a skilled carpenter can help. 🪚 Try describing your need (e.g. \"assemble a bookshelf\" or \"custom cabinet install\") and your area.",
    },
    IntentRule {
        keywords: &["book", "schedule"],
        response: "To book a service, first describe what kind of job you need and where you're located. You’ll then be able to view available professionals and choose one based on their profile and rates. 📅",
    },
    IntentRule {
        keywords: &["paint", "painting", "wall"],
        response: "Looking for painting services? 🎨 Whether it's interior or exterior walls, find professional painters nearby. Be sure to specify the area and type of paint job for accurate quotes.",
    },
    IntentRule {
        keywords: &["roof", "leakage", "shingles"],
        response: "Roof repairs or replacements? 🏠 Search for experienced roofing contractors in your city. Describe the issue like \"roof leak after rain\" to get the best help.",
    },
    IntentRule {
        keywords: &["pest", "exterminator", "insects", "rodents"],
        response: "Dealing with pests? 🐜 Find licensed pest control experts for termite treatment, rodent removal, and more. Mention the pest type and location for quick assistance.",
    },
    IntentRule {
        keywords: &["hvac", "air conditioning", "heater", "furnace"],
        response: "Need HVAC services? ❄️🔥 Look for certified technicians to repair or install air conditioners, heaters, or furnaces. Include your city and the specific problem for faster service.",
    },
    IntentRule {
        keywords: &["moving", "relocate", "pack", "storage"],
        response: "Planning a move? 🚚 Hire professional movers for packing, transporting, or storage solutions. Describe the size of your move and location to find the right team.",
    },
    IntentRule {
        keywords: &["cleanse", "detox", "spa"],
        response: "Looking for wellness services? 💆‍♀️ Search for local spas, massage therapists, or detox centers. Specify the treatment and your area to get personalized recommendations.",
    },
    IntentRule {
        keywords: &["tutor", "lesson", "class", "teacher"],
        response: "Need tutoring or lessons? 📚 Find qualified tutors or instructors for various subjects or skills. Mention the subject and your location to connect with the best fit.",
    },
    IntentRule {
        keywords: &["car", "auto", "mechanic", "repair"],
        response: "Car troubles? 🚗 Search for trusted mechanics or auto repair shops nearby. Describe the issue and your city to get reliable service options.",
    },
    IntentRule {
        keywords: &["tech", "computer", "repair", "setup"],
        response: "Having tech issues? 💻 Find IT professionals or computer repair services in your area. Include the device and problem for tailored support.",
    },
    IntentRule {
        keywords: &["lock", "key", "locksmith"],
        response: "Locked out or need new keys? 🔐 Find reliable locksmiths nearby for lock repairs, key duplication, or emergency lockout services. Provide your location for quick assistance.",
    },
    IntentRule {
        keywords: &["window", "glass", "pane", "repair"],
        response: "Need window or glass repairs? 🪟 Search for professionals who can fix or replace broken windows, glass panes, or screens. Mention the type of repair and your city for accurate quotes.",
    },
    IntentRule {
        keywords: &["floor", "tile", "carpet", "hardwood"],
        response: "Looking to install or repair flooring? 🛠️ Find experts in tile, carpet, hardwood, or laminate flooring. Describe your project and location to get matched with pros.",
    },
    IntentRule {
        keywords: &["appliance", "fridge", "oven", "washer", "dryer"],
        response: "Appliance not working? 🧺 Find certified technicians to repair refrigerators, ovens, washers, dryers, and more. Include the appliance type and your area for faster help.",
    },
    IntentRule {
        keywords: &["roof cleaning", "gutter", "pressure wash", "power wash"],
        response: "Need exterior cleaning? 🚿 Look for services like roof cleaning, gutter clearing, or pressure washing. Specify the service and your location to find local providers.",
    },
    IntentRule {
        keywords: &["photographer", "photo", "shoot", "wedding"],
        response: "Looking for a photographer? 📸 Find professionals for events, portraits, weddings, or commercial shoots. Mention the event type and city to connect with photographers near you.",
    },
    IntentRule {
        keywords: &["cater", "catering", "food", "party"],
        response: "Planning an event? 🍽️ Search for catering services to provide delicious food for your party or gathering. Include your location and event details for the best matches.",
    },
    IntentRule {
        keywords: &["fitness", "trainer", "yoga", "personal trainer"],
        response: "Want to get fit? 💪 Find personal trainers, yoga instructors, or fitness coaches nearby. Describe your goals and location to find the perfect match.",
    },
    IntentRule {
        keywords: &["pet", "dog walker", "pet sitter", "grooming"],
        response: "Need pet care? 🐕 Find dog walkers, pet sitters, or groomers in your area. Specify the service and your city to get connected with trusted pet professionals.",
    },
    IntentRule {
        keywords: &["translator", "translation", "interpreter", "language"],
        response: "Looking for translation or interpretation services? 🌐 Find qualified translators or interpreters for various languages. Mention the language and location to get started.",
    },
    IntentRule {
        keywords: &["event planner", "party", "wedding planner", "organizer"],
        response: "Planning an event? 🎉 Hire experienced event planners or organizers to make your occasion memorable. Provide details and your city to find the right professionals.",
    },
    IntentRule {
        keywords: &["legal", "lawyer", "attorney", "consultation"],
        response: "Need legal advice? ⚖️ Search for qualified lawyers or legal consultants in your area. Describe your issue and location to connect with legal experts.",
    },
    IntentRule {
        keywords: &["accountant", "tax", "bookkeeping", "finance"],
        response: "Looking for financial help? 💼 Find accountants, tax preparers, or bookkeepers nearby. Mention your needs and city for personalized assistance.",
    },
    IntentRule {
        keywords: &["massage", "therapist", "spa", "relax"],
        response: "Want to relax? 💆‍♂️ Find massage therapists or spa services in your area. Specify the treatment type and location to get matched.",
    },
    IntentRule {
        keywords: &["web", "design", "developer", "website"],
        response: "Need a website or app? 💻 Find skilled web designers and developers nearby. Describe your project and location to get started.",
    },
];

/// Pure function of the input and the rule table; no state, no side effects.
pub fn classify(text: &str) -> &'static str {
    let message = text.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| message.contains(k)))
        .map(|rule| rule.response)
        .unwrap_or(FALLBACK_RESPONSE)
}
