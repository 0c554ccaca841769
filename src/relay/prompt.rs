use crate::{catalog::ServiceCatalog, config::PersonaConfig};

const BASE_RULES: &[&str] = &[
    "When a client asks about prices, durations or whether a service is offered, answer from the service menu below.",
    "If a service is not on the menu, say that the salon does not currently offer it. Never invent services, prices or durations.",
    "Quote prices exactly as listed, including the currency.",
    "You cannot book, move or cancel appointments. For bookings, invite the client to contact the salon directly.",
    "For general beauty questions, give helpful advice without making medical claims.",
];

/// Builds the system instruction sent with every request.
pub fn build_instruction(persona: &PersonaConfig, catalog: &ServiceCatalog) -> String {
    let mut instruction = format!(
        "You are {}, the AI assistant for {}.\n\
         You help clients with questions about the salon's services, prices and durations, \
         and with general beauty questions.\n\n\
         Tone: {}\n\n\
         Rules:\n",
        persona.assistant_name, persona.business_name, persona.tone
    );

    for rule in BASE_RULES
        .iter()
        .copied()
        .chain(persona.extra_rules.iter().map(String::as_str))
    {
        instruction.push_str("- ");
        instruction.push_str(rule);
        instruction.push('\n');
    }

    instruction.push_str("\nService menu:\n");
    instruction.push_str(&catalog.render());
    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_names_persona_and_business() {
        let persona = PersonaConfig::default();
        let catalog = ServiceCatalog::bundled().unwrap();

        let instruction = build_instruction(&persona, &catalog);

        assert!(instruction.starts_with("You are Bella, the AI assistant for Douda Beauty."));
        assert!(instruction.contains("Tone: Warm, friendly and concise."));
    }

    #[test]
    fn test_instruction_embeds_full_catalog() {
        let catalog = ServiceCatalog::bundled().unwrap();
        let instruction = build_instruction(&PersonaConfig::default(), &catalog);

        assert!(instruction.ends_with(&catalog.render()));
        for service in &catalog.services {
            assert!(instruction.contains(&service.name), "missing {}", service.name);
        }
    }

    #[test]
    fn test_extra_rules_follow_base_rules() {
        let persona = PersonaConfig {
            extra_rules: vec!["Reply in French if the client writes in French.".to_string()],
            ..PersonaConfig::default()
        };
        let instruction = build_instruction(&persona, &ServiceCatalog::bundled().unwrap());

        let base = instruction.find("Quote prices exactly").unwrap();
        let extra = instruction.find("- Reply in French").unwrap();
        let menu = instruction.find("Service menu:").unwrap();
        assert!(base < extra && extra < menu);
    }
}
