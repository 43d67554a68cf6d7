//! Fixed catalog of defense argument kinds.
//!
//! Ids are stable: feedback records, the decision matrix and the classifier
//! prompt all refer to arguments by these numbers. The two high-risk entries
//! (6 and 9) are the ones the external classifier over-detects; their
//! candidates must pass the structural checks in `recursal-engine`.

use crate::types::ArgumentId;

/// One catalog entry.
pub struct ArgumentKind {
    pub id: ArgumentId,
    /// Portuguese description as it appears in legal drafts and prompts.
    pub description: &'static str,
    /// Flagged ids need a structural signature in the source span before a
    /// classifier candidate is accepted.
    pub high_false_positive_risk: bool,
}

/// Judicial res-judicata argument (requires process-number evidence).
pub const ARG_RES_JUDICATA: ArgumentId = ArgumentId(6);
/// Prior administrative process argument (requires NUP/process evidence).
pub const ARG_PRIOR_ADMIN: ArgumentId = ArgumentId(9);
/// Negation-of-cohabitation argument, the default target of address inference.
pub const ARG_DISTINCT_ADDRESS: ArgumentId = ArgumentId(4);
/// "A common child does not prove a stable union."
pub const ARG_COMMON_CHILD: ArgumentId = ArgumentId(2);
/// "Common child without shared custody."
pub const ARG_CHILD_NO_CUSTODY: ArgumentId = ArgumentId(12);

pub const CATALOG: &[ArgumentKind] = &[
    ArgumentKind {
        id: ArgumentId(1),
        description: "Negativa de união estável",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(2),
        description: "Filho em comum não caracteriza união estável",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(3),
        description: "Mais de um filho em comum não caracteriza",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(4),
        description: "Endereço distinto / negativa de coabitação",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(5),
        description: "Erro em bases cadastrais",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(6),
        description: "Coisa julgada judicial",
        high_false_positive_risk: true,
    },
    ArgumentKind {
        id: ArgumentId(7),
        description: "Dissolução da união estável",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(8),
        description: "Ameaça de judicialização",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(9),
        description: "Processo administrativo anterior",
        high_false_positive_risk: true,
    },
    ArgumentKind {
        id: ArgumentId(10),
        description: "Testemunhos de terceiros",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(11),
        description: "Inconsistência no CadÚnico",
        high_false_positive_risk: false,
    },
    ArgumentKind {
        id: ArgumentId(12),
        description: "Filho em comum sem guarda compartilhada",
        high_false_positive_risk: false,
    },
];

/// Look up a catalog entry by id.
pub fn lookup(id: ArgumentId) -> Option<&'static ArgumentKind> {
    CATALOG.iter().find(|kind| kind.id == id)
}

/// Whether the id exists in the catalog at all.
pub fn is_known(id: ArgumentId) -> bool {
    lookup(id).is_some()
}

/// Human description for an id, or a placeholder for off-catalog ids.
pub fn describe(id: ArgumentId) -> &'static str {
    lookup(id).map_or("argumento fora do catálogo", |kind| kind.description)
}
