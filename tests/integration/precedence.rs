use robolang::compile;

fn out(source: &str) -> String {
    compile(source).unwrap()
}

#[test]
fn multiplication_binds_tighter_than_subtraction() {
    assert_eq!(out("x = 60 - 15 / 3"), "♥x=60-15/3");
}

#[test]
fn explicit_groups_survive_when_they_matter() {
    assert_eq!(out("x = 60 - 15 / (2 + 5)"), "♥x=60-15/(2+5)");
    assert_eq!(out("x = (1 + 2) * 3"), "♥x=(1+2)*3");
}

#[test]
fn redundant_groups_are_dropped() {
    assert_eq!(out("x = (1) + ((2 * 3))"), "♥x=1+2*3");
    assert_eq!(out("x = ((((7))))"), "♥x=7");
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(out("x = 10 - 4 - 3"), "♥x=10-4-3");
    assert_eq!(out("x = 10 - (4 - 3)"), "♥x=10-(4-3)");
}

#[test]
fn shifts_sit_below_additive() {
    assert_eq!(out("x = 2 * 3 + 4 << 1"), "♥x=2*3+4<<1");
    assert_eq!(out("x = 2 << 1 + 1"), "♥x=2<<1+1");
}

#[test]
fn bitwise_tiers_order_and_xor_or() {
    assert_eq!(out("x = 1 & 3 ^ 2"), "♥x=1&3^2");
    assert_eq!(out("x = 1 | 3 ^ 2"), "♥x=1|3^2");
    assert_eq!(out("x = (1 | 3) ^ 2"), "♥x=(1|3)^2");
}

#[test]
fn logical_or_is_the_loosest_tier() {
    assert_eq!(out("b = true || false && true"), "♥b=true||false&&true");
    assert_eq!(out("b = (true || false) && true"), "♥b=(true||false)&&true");
}

#[test]
fn comparisons_feed_logical_operators() {
    assert_eq!(out("b = 1 < 2 && 3 >= 3"), "♥b=1<2&&3>=3");
    assert_eq!(out("b = 1 + 1 == 2"), "♥b=1+1==2");
}

#[test]
fn unary_minus_parenthesizes_compound_operands() {
    assert_eq!(out("x = -(1 + 2)"), "♥x=-(1+2)");
    assert_eq!(out("x = 5 - -3"), "♥x=5--3");
    assert_eq!(out("x = - - 3"), "♥x=3");
}

#[test]
fn unary_plus_disappears() {
    assert_eq!(out("x = +5"), "♥x=5");
    assert_eq!(out("x = 1 + +5"), "♥x=1+5");
}

#[test]
fn logical_not_and_bit_not() {
    assert_eq!(out("b = !(1 < 2)"), "♥b=!(1<2)");
    assert_eq!(out("x = ~7"), "♥x=~7");
    assert_eq!(out("b = !!true"), "♥b=true");
}

#[test]
fn mixed_numeric_arithmetic_promotes_to_float() {
    assert_eq!(out("x = 1 + 0.5"), "♥x=1+0.5");
    // result type is float, so an int reassignment later is rejected
    assert_eq!(
        compile("x = 1 + 0.5 y = 1 y = x").unwrap_err().kind(),
        "implicit-conversion"
    );
}

#[test]
fn operand_type_mismatch_is_an_invalid_operation() {
    assert_eq!(compile("x = true + 1").unwrap_err().kind(), "invalid-operation");
    assert_eq!(compile("x = 'a' << 1").unwrap_err().kind(), "invalid-operation");
    assert_eq!(compile("b = 1 && true").unwrap_err().kind(), "invalid-operation");
    assert_eq!(compile("x = -true").unwrap_err().kind(), "invalid-operation");
}
