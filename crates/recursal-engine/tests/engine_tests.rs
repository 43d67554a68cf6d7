//! End-to-end pipeline tests against the shipped decision-rule table.

use recursal_core::config::RulesConfig;
use recursal_core::types::{ArgumentCandidate, ArgumentId, Finding, FindingCategory, Outcome};
use recursal_engine::{Engine, RejectReason};

fn shipped_config() -> RulesConfig {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../rules/decision_rules.json");
    RulesConfig::load(std::path::Path::new(path)).expect("shipped rules load")
}

fn engine() -> Engine {
    Engine::new(&shipped_config()).expect("shipped rules compile")
}

fn finding(category: FindingCategory) -> Finding {
    Finding {
        code: "TC-001/2026".into(),
        category,
        description: String::new(),
    }
}

fn candidate(id: u8, text: &str) -> ArgumentCandidate {
    ArgumentCandidate {
        argument_id: ArgumentId(id),
        source_text: text.into(),
        confidence: 0.8,
    }
}

#[test]
fn shipped_table_is_total_over_every_category() {
    let config = shipped_config();
    let engine = Engine::new(&config).unwrap();
    for category in FindingCategory::ALL {
        let eval = engine
            .evaluate(&finding(*category), &[], "")
            .expect("decide must be total");
        // Default outcome with no surviving arguments (modulo inference).
        assert!(matches!(
            eval.outcome,
            Outcome::Procedente | Outcome::Improcedente
        ));
    }
}

#[test]
fn address_finding_with_no_candidates_gets_inferred_denial() {
    let eval = engine()
        .evaluate(&finding(FindingCategory::MultipleAddressRecords), &[], "")
        .unwrap();
    assert_eq!(eval.arguments.as_slice(), &[ArgumentId(4)]);
    assert_eq!(eval.inferred, Some(ArgumentId(4)));
    // Denial alone does not rebut the multi-base address match.
    assert_eq!(eval.outcome, Outcome::Improcedente);
}

#[test]
fn denial_plus_registry_error_upholds_address_appeal() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::MultipleAddressRecords),
            &[candidate(5, "os endereços no TSE estão desatualizados")],
            "",
        )
        .unwrap();
    assert_eq!(eval.arguments.as_slice(), &[ArgumentId(5), ArgumentId(4)]);
    assert_eq!(eval.outcome, Outcome::Procedente);
}

#[test]
fn res_judicata_with_process_number_prevails_everywhere() {
    let span = "decisão judicial transitada em julgado no processo 1234567-89.2020.4.04.1234";
    for category in FindingCategory::ALL {
        let eval = engine()
            .evaluate(&finding(*category), &[candidate(6, span)], "")
            .unwrap();
        assert_eq!(eval.outcome, Outcome::Procedente, "category: {category}");
    }
}

#[test]
fn generic_jurisprudence_is_dropped_and_does_not_decide() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::MultipleChildren),
            &[candidate(6, "conforme jurisprudência do STF")],
            "",
        )
        .unwrap();
    assert!(eval.arguments.is_empty());
    assert_eq!(eval.rejections.len(), 1);
    assert_eq!(eval.rejections[0].reason, RejectReason::NoProcessReference);
    assert_eq!(eval.outcome, Outcome::Improcedente);
}

#[test]
fn prior_admin_process_with_nup_is_kept() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::InssPension),
            &[candidate(9, "NUP 50001234567, já deferido administrativamente")],
            "",
        )
        .unwrap();
    assert_eq!(eval.arguments.as_slice(), &[ArgumentId(9)]);
    assert_eq!(eval.outcome, Outcome::Procedente);
}

#[test]
fn registry_only_finding_is_reclassified_and_then_inferred() {
    // No child admitted: CadÚnico implies a declared common address, the
    // finding becomes registry+address, and the denial argument is inferred.
    let eval = engine()
        .evaluate(&finding(FindingCategory::OnlyRegistryMatch), &[], "")
        .unwrap();
    assert_eq!(eval.category, FindingCategory::RegistryAddressMatch);
    assert_eq!(
        eval.reclassified.as_ref().map(|r| r.from),
        Some(FindingCategory::OnlyRegistryMatch)
    );
    assert_eq!(eval.arguments.as_slice(), &[ArgumentId(4)]);
}

#[test]
fn registry_only_with_admitted_child_becomes_child_registry() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::OnlyRegistryMatch),
            &[
                candidate(2, "o filho em comum não caracteriza união estável"),
                candidate(11, "o CadÚnico contém dados desatualizados"),
            ],
            "",
        )
        .unwrap();
    assert_eq!(eval.category, FindingCategory::ChildRegistry);
    // Not an address category: nothing inferred.
    assert_eq!(eval.inferred, None);
    assert_eq!(eval.outcome, Outcome::Procedente);
}

#[test]
fn single_child_finding_upgraded_when_defense_reveals_plural_children() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::SingleChild),
            &[candidate(2, "um filho não caracteriza união estável")],
            "Tenho meus filhos João e Maria com o falecido",
        )
        .unwrap();
    assert_eq!(eval.category, FindingCategory::MultipleChildren);
    // Argument 2 alone no longer rebuts the upgraded finding.
    assert_eq!(eval.outcome, Outcome::Improcedente);
}

#[test]
fn non_address_category_set_is_left_unchanged() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::MultipleChildren),
            &[candidate(11, "inconsistência no CadÚnico")],
            "",
        )
        .unwrap();
    assert_eq!(eval.arguments.as_slice(), &[ArgumentId(11)]);
    assert_eq!(eval.inferred, None);
}

#[test]
fn duplicate_candidates_resolve_once() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::MultipleChildren),
            &[
                candidate(3, "mais de um filho não caracteriza"),
                candidate(3, "repetição do mesmo argumento"),
                candidate(10, "vizinhos atestam residências separadas"),
            ],
            "",
        )
        .unwrap();
    assert_eq!(eval.arguments.as_slice(), &[ArgumentId(3), ArgumentId(10)]);
    assert_eq!(eval.outcome, Outcome::Procedente);
}

#[test]
fn off_catalog_id_is_rejected_with_reason() {
    let eval = engine()
        .evaluate(
            &finding(FindingCategory::Unclassified),
            &[candidate(42, "boa-fé e segurança jurídica")],
            "",
        )
        .unwrap();
    assert!(eval.arguments.is_empty());
    assert_eq!(eval.rejections[0].reason, RejectReason::UnknownArgument);
}

#[test]
fn evaluation_carries_table_version() {
    let eval = engine()
        .evaluate(&finding(FindingCategory::SingleChild), &[], "")
        .unwrap();
    assert_eq!(eval.table_version, "2026-08");
}

#[test]
fn reload_rejects_broken_table_and_keeps_serving() {
    let mut engine = engine();
    let mut broken = shipped_config();
    broken.rules.retain(|r| r.category != FindingCategory::InssPension);
    assert!(engine.reload(&broken).is_err());
    // Old table still in service.
    assert!(engine
        .evaluate(&finding(FindingCategory::InssPension), &[], "")
        .is_ok());
}
