#![allow(dead_code)]

use a64_addsub::frontend::a64::decoder::A64InstructionName;
use a64_addsub::{translate, A64LocationDescriptor, A64State, Block, TranslationOptions};

pub const BASE_PC: u64 = 0x1_0000;

/// `op`/`S` bits (30, 29) for a mnemonic.
fn op_s(name: A64InstructionName) -> u32 {
    use A64InstructionName::*;
    match name {
        ADD_imm | ADD_shift | ADD_ext | ADC => 0b00,
        ADDS_imm | ADDS_shift | ADDS_ext | ADCS => 0b01,
        SUB_imm | SUB_shift | SUB_ext | SBC => 0b10,
        SUBS_imm | SUBS_shift | SUBS_ext | SBCS => 0b11,
    }
}

pub fn add_sub_imm(name: A64InstructionName, sf: bool, shift: u32, imm12: u32, rn: u32, rd: u32) -> u32 {
    (sf as u32) << 31 | op_s(name) << 29 | 0b10001 << 24 | shift << 22 | imm12 << 10 | rn << 5 | rd
}

pub fn add_sub_shift(
    name: A64InstructionName,
    sf: bool,
    shift: u32,
    rm: u32,
    imm6: u32,
    rn: u32,
    rd: u32,
) -> u32 {
    (sf as u32) << 31 | op_s(name) << 29 | 0b01011 << 24 | shift << 22 | rm << 16 | imm6 << 10 | rn << 5 | rd
}

pub fn add_sub_ext(
    name: A64InstructionName,
    sf: bool,
    rm: u32,
    option: u32,
    imm3: u32,
    rn: u32,
    rd: u32,
) -> u32 {
    (sf as u32) << 31
        | op_s(name) << 29
        | 0b01011 << 24
        | 1 << 21
        | rm << 16
        | option << 13
        | imm3 << 10
        | rn << 5
        | rd
}

pub fn add_sub_carry(name: A64InstructionName, sf: bool, rm: u32, rn: u32, rd: u32) -> u32 {
    (sf as u32) << 31 | op_s(name) << 29 | 0b11010000 << 21 | rm << 16 | rn << 5 | rd
}

pub fn translate_words(words: &[u32], options: TranslationOptions) -> Block {
    let words = words.to_vec();
    let fetch = move |pc: u64| -> Option<u32> {
        let offset = pc.checked_sub(BASE_PC)? / 4;
        words.get(offset as usize).copied()
    };
    translate(A64LocationDescriptor::new(BASE_PC, false), &fetch, options)
}

/// Translate a single instruction the way a dispatcher would: the block holds
/// just this instruction.
pub fn translate_single(word: u32) -> Block {
    let fetch = move |pc: u64| (pc == BASE_PC).then_some(word);
    translate(A64LocationDescriptor::new(BASE_PC, true), &fetch, TranslationOptions::default())
}

/// A register file with recognisable junk in every register.
pub fn seeded_state() -> A64State {
    let mut state = A64State { pc: BASE_PC, sp: 0xFFFF_0000_0000_8000, ..A64State::default() };
    for (i, slot) in state.reg.iter_mut().enumerate() {
        *slot = 0xA5A5_0000_0000_0000 | (i as u64) << 32 | 0x1111 * i as u64;
    }
    state
}
