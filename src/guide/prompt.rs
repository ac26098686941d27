//! Guide prompt text.
//!
//! The system instruction is fixed apart from the list of reserve names, which
//! is spliced in so the model only talks about reserves that exist here.

use crate::catalog::Catalog;

/// First message of every chat session.
pub const GREETING: &str = "مرحباً بك! أنا دليلك الذكي للمحميات السعودية. كيف يمكنني مساعدتك اليوم في التخطيط لرحلتك أو معرفة المزيد عن الطبيعة؟";

/// Shown in place of a reply whenever the request fails.
pub const FALLBACK_REPLY: &str = "واجهت مشكلة تقنية بسيطة. هل يمكنك إعادة صياغة سؤالك؟";

const INSTRUCTION_HEAD: &str = "أنت مرشد سياحي خبير ومتخصص في المحميات الطبيعية والملكية في المملكة العربية السعودية.
دورك هو مساعدة الزوار في التخطيط لرحلاتهم، والإجابة عن الأسئلة المتعلقة بالحياة الفطرية، والأنشطة، والمناخ في هذه المحميات.";

const INSTRUCTION_RULES: &str = "عند الإجابة:
1. كن ودوداً ومتحمساً ومشجعاً للسياحة البيئية.
2. استخدم اللغة العربية الفصحى البسيطة والواضحة.
3. قدم معلومات دقيقة بناءً على الحقائق البيئية والجغرافية للمملكة.
4. إذا سألك المستخدم عن \"أفضل محمية لـ...\" (مثلاً: للتخييم، لرؤية المها، قرب الرياض)، قم بترشيح المحمية المناسبة واشرح السبب.
5. شجع المستخدمين دائماً على الحفاظ على البيئة وعدم ترك أثر.

لا تخرج عن سياق المحميات السعودية والسياحة البيئية.";

/// Builds the system instruction for `catalog`.
pub fn system_instruction(catalog: &Catalog) -> String {
    format!(
        "{}\nلديك معرفة عميقة بالمحميات التالية: {}.\n\n{}",
        INSTRUCTION_HEAD,
        catalog.names().join(", "),
        INSTRUCTION_RULES
    )
}

/// The user-role text for one question. With a context, a line naming the
/// page being viewed precedes the question.
pub fn compose_prompt(question: &str, context: Option<&str>) -> String {
    match context {
        Some(page) => format!("المستخدم يسأل وهو يتصفح صفحة: {}.\nالسؤال: {}", page, question),
        None => question.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::reserve;
    use crate::model::ReserveType;

    #[test]
    fn test_instruction_lists_every_reserve() {
        let catalog = Catalog::builtin().unwrap();
        let instruction = system_instruction(&catalog);
        for name in catalog.names() {
            assert!(instruction.contains(name), "instruction is missing '{}'", name);
        }
    }

    #[test]
    fn test_instruction_tracks_injected_catalog() {
        let catalog = Catalog::from_reserves(vec![
            reserve("x", "Test Reserve A", ReserveType::Natural, "r"),
            reserve("y", "Test Reserve B", ReserveType::Royal, "r"),
        ])
        .unwrap();
        let instruction = system_instruction(&catalog);
        assert!(instruction.contains("Test Reserve A, Test Reserve B."));
        assert!(!instruction.contains("محمية جزر فرسان"));
    }

    #[test]
    fn test_instruction_carries_domain_rules() {
        let instruction = system_instruction(&Catalog::builtin().unwrap());
        assert!(instruction.contains("أفضل محمية"));
        assert!(instruction.contains("عدم ترك أثر"));
        assert!(instruction.contains("لا تخرج عن سياق"));
    }

    #[test]
    fn test_prompt_without_context_is_raw_question() {
        assert_eq!(compose_prompt("أين أرى المها؟", None), "أين أرى المها؟");
    }

    #[test]
    fn test_prompt_with_context_is_two_lines() {
        let prompt = compose_prompt("متى أزور؟", Some("محمية جزر فرسان"));
        let lines: Vec<_> = prompt.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "المستخدم يسأل وهو يتصفح صفحة: محمية جزر فرسان.");
        assert_eq!(lines[1], "السؤال: متى أزور؟");
    }
}
