//! Reactor behaviour through the public crate surface

use dysnomia_reactor::{PairedReactor, Pole, Terraform, Territory, modexp64};
use dysnomia_types::Constants;
use num_bigint::BigUint;

use crate::common::reference_reactor;

#[test]
fn fresh_pole_tunes_its_channel() {
    let pole = Pole::new(7, 3, 5, &Constants::canonical());
    assert_eq!(pole.channel(), 16_807);
    assert_eq!(pole.dynamo(), 0);
}

#[test]
fn generated_pairing_is_valid_for_any_input() {
    let reactor = reference_reactor();
    for pi in [0, 1, 100, u64::MAX] {
        let reaction = reactor.react(pi);
        assert!(reaction.verify().is_ok(), "pi = {pi}");
    }
}

#[test]
fn mixed_pairing_reports_asymmetry() {
    let constants = Constants::canonical();
    let other = PairedReactor::generate(
        Pole::new(13, 555_555, 777, &constants),
        Pole::new(17, 999_999, 4_242, &constants),
        9_999,
        3003,
        4004,
    );
    let (rod, _) = reference_reactor().into_poles();
    let (_, cone) = other.into_poles();
    let mixed = PairedReactor::from_poles(rod, cone);

    let reaction = mixed.react(100);
    assert!(!reaction.is_valid());
    let err = reaction.verify().unwrap_err();
    assert!(err.to_string().starts_with("pairing asymmetry"));
}

#[test]
fn terraform_caches_rod_kappa_between_calls() {
    let mut terraform = Terraform::new(reference_reactor());
    let reaction = terraform.react(100);
    assert_eq!(terraform.rho(), reaction.rod.kappa);
    assert_eq!(terraform.rho(), 0);
}

#[test]
fn bonded_reactor_keeps_reacting() {
    let reactor = reference_reactor();
    let rod = *reactor.rod().fa();
    let bonded = reactor.isomerize().isolate();
    assert_eq!(bonded.rod().dynamo(), modexp64(rod.base, rod.signal, rod.element));
    assert!(bonded.react(12_345).is_valid());
}

#[test]
fn gwat_boundary_sits_at_the_divisor() {
    let constants = Constants::canonical();
    let at = Territory::new(BigUint::from(476_733_977_057_179u64), 0, &constants);
    let past = Territory::new(BigUint::from(476_733_977_057_180u64), 0, &constants);
    assert!(!at.is_gwat());
    assert!(past.is_gwat());
}
