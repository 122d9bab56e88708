//! Deterministic fallback training content.
//!
//! Substituted whenever every provider fails or the model reply fails
//! validation, so an author is never left without reviewable output. The
//! content is a pure function of the draft and company config, localized
//! for Spanish drafts, English otherwise.

use crate::models::{
    GeneratedTraining, QuizQuestion, SetupConfig, TrainingContent, TrainingDraft, TrainingSection,
};

/// Build complete fallback content for a draft, quiz sized exactly to the
/// draft's configured question count.
pub fn fallback_training(draft: &TrainingDraft, config: &SetupConfig) -> GeneratedTraining {
    let spanish = draft.language == "es";
    let company = &config.company.name;
    let title = &draft.title;

    let training = if spanish {
        TrainingContent {
            introduction: format!(
                "Bienvenido al módulo de capacitación {title} para {company}. Esta capacitación \
                 se basa en los procedimientos y políticas específicos de la empresa."
            ),
            sections: vec![TrainingSection {
                title: "Procedimientos Específicos de la Empresa".into(),
                content: "Esta sección se basa en los procedimientos y políticas más recientes \
                          de la empresa."
                    .into(),
                key_points: vec![
                    "Seguir los protocolos específicos de la empresa".into(),
                    "Aplicar los requisitos de seguridad del departamento".into(),
                    "Utilizar herramientas y métodos aprobados".into(),
                ],
                source_docs: source_names(draft),
            }],
            safety_notes: vec![
                format!("Seguir todos los protocolos de seguridad de {company}"),
                "Cumplir con los requisitos de EPP".into(),
            ],
            best_practices: vec!["Utilizar las mejores prácticas aprobadas por la empresa".into()],
            common_mistakes: vec!["Desviarse de los procedimientos establecidos".into()],
        }
    } else {
        TrainingContent {
            introduction: format!(
                "Welcome to the {title} training module for {company}. This training is based on \
                 the company's specific procedures and policies."
            ),
            sections: vec![TrainingSection {
                title: "Company-Specific Procedures".into(),
                content: "This section is based on the latest company procedures and policies."
                    .into(),
                key_points: vec![
                    "Follow company-specific protocols".into(),
                    "Apply department-specific safety requirements".into(),
                    "Use company-approved tools and methods".into(),
                ],
                source_docs: source_names(draft),
            }],
            safety_notes: vec![
                format!("Follow all {company} safety protocols"),
                "Comply with company PPE requirements".into(),
            ],
            best_practices: vec!["Use company-approved best practices".into()],
            common_mistakes: vec!["Deviating from established procedures".into()],
        }
    };

    GeneratedTraining {
        training,
        quiz: fallback_quiz(draft, config),
    }
}

/// The fallback quiz alone, sized exactly to the draft's question count.
/// Also used to pad short model-generated quizzes.
pub fn fallback_quiz(draft: &TrainingDraft, config: &SetupConfig) -> Vec<QuizQuestion> {
    let templates = quiz_templates(draft, config);
    let count = draft.quiz.question_count;
    (0..count)
        .map(|i| templates[i % templates.len()].clone())
        .collect()
}

fn source_names(draft: &TrainingDraft) -> Vec<String> {
    draft.documents.iter().map(|d| d.name.clone()).collect()
}

fn quiz_templates(draft: &TrainingDraft, config: &SetupConfig) -> Vec<QuizQuestion> {
    let company = &config.company.name;
    let source = draft.documents.first().map(|d| d.name.clone());

    if draft.language == "es" {
        vec![
            QuizQuestion {
                question: format!(
                    "Según el manual de seguridad de {company}, ¿cuál es el primer paso requerido?"
                ),
                options: vec![
                    "A) Revisar las pautas generales".into(),
                    "B) Completar la lista de verificación previa".into(),
                    "C) Pedir permiso al supervisor".into(),
                    "D) Revisar los procedimientos estándar".into(),
                ],
                correct: 1,
                explanation: format!(
                    "El manual de {company} requiere completar la lista de verificación."
                ),
                kind: "Política de la Empresa".into(),
                source: source.clone(),
            },
            QuizQuestion {
                question: "¿Cuándo se debe reportar una condición insegura?".into(),
                options: vec![
                    "A) Al final del turno".into(),
                    "B) Inmediatamente".into(),
                    "C) Durante la reunión semanal".into(),
                    "D) Solo si ocurre un incidente".into(),
                ],
                correct: 1,
                explanation: "Las condiciones inseguras se reportan de inmediato.".into(),
                kind: "Seguridad".into(),
                source: source.clone(),
            },
            QuizQuestion {
                question: "¿Qué se debe usar al realizar esta tarea?".into(),
                options: vec![
                    "A) Herramientas personales".into(),
                    "B) Cualquier equipo disponible".into(),
                    "C) Equipo aprobado por la empresa".into(),
                    "D) Equipo prestado".into(),
                ],
                correct: 2,
                explanation: "Solo se permite equipo aprobado por la empresa.".into(),
                kind: "Procedimiento".into(),
                source,
            },
        ]
    } else {
        vec![
            QuizQuestion {
                question: format!(
                    "According to the {company} safety manual, what is the first required step?"
                ),
                options: vec![
                    "A) Check general guidelines".into(),
                    "B) Complete the pre-operation checklist".into(),
                    "C) Ask a supervisor for permission".into(),
                    "D) Review standard procedures".into(),
                ],
                correct: 1,
                explanation: format!("The {company} manual requires completing the checklist."),
                kind: "Company Policy".into(),
                source: source.clone(),
            },
            QuizQuestion {
                question: "When must an unsafe condition be reported?".into(),
                options: vec![
                    "A) At the end of the shift".into(),
                    "B) Immediately".into(),
                    "C) During the weekly meeting".into(),
                    "D) Only if an incident occurs".into(),
                ],
                correct: 1,
                explanation: "Unsafe conditions are reported immediately.".into(),
                kind: "Safety".into(),
                source: source.clone(),
            },
            QuizQuestion {
                question: "What equipment must be used for this task?".into(),
                options: vec![
                    "A) Personal tools".into(),
                    "B) Whatever is on hand".into(),
                    "C) Company-approved equipment".into(),
                    "D) Borrowed equipment".into(),
                ],
                correct: 2,
                explanation: "Only company-approved equipment is permitted.".into(),
                kind: "Procedure".into(),
                source,
            },
        ]
    }
}
