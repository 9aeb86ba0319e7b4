//! Known ciphertexts and stepping sequences for the historical machines.
//!
//! Every expected value here is a published reference output; a mismatch
//! means the conversion pipeline or the stepping order has drifted.

use std::sync::Arc;

use enigma_rotor::{historical, Alphabet, EnigmaError, Machine, Permutation, Session};

fn army(rotors: [&str; 4], setting: &str) -> Machine {
    let mut m = historical::army_config().unwrap().build().unwrap();
    m.insert_rotors(&rotors).unwrap();
    m.set_rotors(setting).unwrap();
    m
}

fn naval(rotors: [&str; 5], setting: &str) -> Machine {
    let mut m = historical::machine_config().unwrap().build().unwrap();
    m.insert_rotors(&rotors).unwrap();
    m.set_rotors(setting).unwrap();
    m
}

// ═══════════════════════════════════════════════════════════════════════
// Ciphertext vectors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn army_rotors_i_ii_iii_at_aaa() {
    let mut m = army(["B", "I", "II", "III"], "AAA");
    assert_eq!(m.convert("AAAAA").unwrap(), "BDZGO");
}

#[test]
fn army_ring_setting_bbb() {
    let mut m = army(["B", "I", "II", "III"], "AAA");
    m.set_rotor_ring("BBB").unwrap();
    assert_eq!(m.convert("AAAAA").unwrap(), "EWTYX");
}

/// A thin reflector with Beta at A behaves as the wide reflector B.
#[test]
fn naval_thin_reflector_matches_army() {
    let mut m = naval(["B-thin", "Beta", "I", "II", "III"], "AAAA");
    assert_eq!(m.convert("AAAAA").unwrap(), "BDZGO");
}

#[test]
fn naval_with_plugboard() {
    let mut m = naval(["B-thin", "Beta", "III", "IV", "I"], "AXLE");
    for cycle in ["(HQ)", "(EX)", "(IP)", "(TR)", "(BY)"] {
        m.plugboard_mut().add_cycle(cycle).unwrap();
    }
    assert_eq!(
        m.convert("FROMHISSHOULDERHIAWATHA").unwrap(),
        "QVPQSOKOILPUBKJZPISFXDW"
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Stepping
// ═══════════════════════════════════════════════════════════════════════

/// II notches at E and III at V: ADU -> ADV -> AEW -> BFX.
#[test]
fn middle_rotor_double_steps() {
    let mut m = army(["B", "I", "II", "III"], "ADU");
    let mut seen = Vec::new();
    for _ in 0..3 {
        m.convert("A").unwrap();
        seen.push(m.settings());
    }
    assert_eq!(seen, ["ADV", "AEW", "BFX"]);
}

/// A full revolution of the fast rotor turns the middle rotor once, and the
/// following turnover of the middle rotor makes it move on two consecutive
/// symbols.
#[test]
fn double_step_over_full_revolution() {
    let mut m = naval(["B", "Beta", "I", "II", "III"], "AADA");
    let mut middle = Vec::new();
    for _ in 0..26 {
        m.convert("X").unwrap();
        middle.push(m.settings());
    }
    // III reaches its V notch at symbol 21, which drives II onto E.
    assert_eq!(middle[20], "AADV");
    assert_eq!(middle[21], "AAEW");
    assert_eq!(middle[22], "ABFX");
    assert_eq!(middle[25], "ABFA");
}

// ═══════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn swap_a_and_z() {
    let alpha = Arc::new(Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap());
    let perm = Permutation::new("(AZ)", alpha).unwrap();
    assert_eq!(perm.permute_symbol('A').unwrap(), 'Z');
    assert_eq!(perm.invert_symbol('Z').unwrap(), 'A');
    assert_eq!(perm.permute_symbol('B').unwrap(), 'B');
}

#[test]
fn reflector_must_be_leftmost() {
    let mut m = historical::machine_config().unwrap().build().unwrap();
    let err = m.insert_rotors(&["Beta", "B", "III", "IV", "I"]).unwrap_err();
    assert!(matches!(err, EnigmaError::InvalidConfiguration(_)));
}

#[test]
fn setting_of_wrong_length() {
    let mut m = naval(["B", "Beta", "III", "IV", "I"], "AXLE");
    for bad in ["AXL", "AXLEE"] {
        assert!(matches!(
            m.set_rotors(bad),
            Err(EnigmaError::InvalidConfiguration(_))
        ));
    }
}

#[test]
fn reflector_rejects_nonzero_setting() {
    let cat = historical::catalogue().unwrap();
    let mut b = cat.get("B").unwrap().clone();
    assert!(matches!(b.set(1), Err(EnigmaError::InvalidConfiguration(_))));
}

/// Two machines built from one configuration share wiring but not state.
#[test]
fn machines_are_independent() {
    let cfg = historical::machine_config().unwrap();
    let mut a = cfg.build().unwrap();
    let mut b = cfg.build().unwrap();
    for m in [&mut a, &mut b] {
        m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
        m.set_rotors("AAAA").unwrap();
    }
    a.convert("HELLOWORLD").unwrap();
    assert_eq!(a.settings(), "AAAK");
    assert_eq!(b.settings(), "AAAA");
    assert!(Arc::ptr_eq(a.catalogue(), b.catalogue()));
}

// ═══════════════════════════════════════════════════════════════════════
// Configuration file end to end
// ═══════════════════════════════════════════════════════════════════════

const DEFAULT_CONF: &str = "
 ABCDEFGHIJKLMNOPQRSTUVWXYZ
 5 3
 I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
 II ME     (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
 III MV    (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
 IV MJ     (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
 V MZ      (AVOLDRWFIUQ)(BZKSMNHYC) (EGTJPX)
 Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
 Gamma N   (AFNIRLBSQWVXGUZDKMTPCOYJHE)
 B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
           (RX) (SZ) (TV)
 C R       (AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW)
           (QZ) (SX) (UY)
";

#[test]
fn config_file_session() {
    let cfg: enigma_rotor::MachineConfig = DEFAULT_CONF.parse().unwrap();
    assert_eq!(cfg.catalogue().len(), 9);

    let input = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n\
                 FROM his shoULDER Hiawatha\n";
    let mut session = Session::new(cfg.build().unwrap());
    let mut out = Vec::new();
    let err = session.run(input.as_bytes(), &mut out).unwrap_err();
    assert!(err.to_string().starts_with("line 2:"));

    let input = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n\
                 FROM HIS SHOULDER HIAWATHA\n\
                 \n\
                 * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n\
                 QVPQS OKOIL PUBKJ ZPISF XDW\n";
    let mut session = Session::new(cfg.build().unwrap());
    let mut out = Vec::new();
    session.run(input.as_bytes(), &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "QVPQS OKOIL PUBKJ ZPISF XDW\n\nFROMH ISSHO ULDER HIAWA THA\n"
    );
}
