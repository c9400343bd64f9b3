//! End-to-end engine tests.
//!
//! Runs small hand-assembled guest programs through the full pipeline:
//! exit codes, control flow, memory round-trips, console I/O, and fatal
//! faults. Runaway programs are bounded by the harness cycle budget, not
//! by the emulator (which has no built-in step limit).

use pretty_assertions::assert_eq;

use crate::common::builder::instruction::InstructionBuilder;
use crate::common::harness::TestContext;
use rv32emu_core::EmulatorError;

const REG_A0: u32 = 10;
const REG_A7: u32 = 17;

/// addi a7, x0, 0 ; ecall — with a0 already holding the exit code.
fn exit_sequence() -> Vec<u32> {
    vec![
        InstructionBuilder::new().addi(REG_A7, 0, 0).build(),
        InstructionBuilder::new().ecall().build(),
    ]
}

#[test]
fn addi_then_ecall_exits_with_the_register_value() {
    // The x1 round-trip: load 5 into x1, mirror it into a0, exit.
    let mut program = vec![
        InstructionBuilder::new().addi(1, 0, 5).build(),
        InstructionBuilder::new().addi(REG_A0, 1, 0).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(16).unwrap();

    assert_eq!(exit, Some(5));
    assert_eq!(ctx.get_reg(1), 5);
}

#[test]
fn beq_forward_skips_exactly_one_instruction() {
    let mut program = vec![
        InstructionBuilder::new().beq(0, 0, 8).build(),
        InstructionBuilder::new().addi(5, 0, 1).build(), // skipped
        InstructionBuilder::new().addi(6, 0, 2).build(), // branch target
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(16).unwrap();

    assert_eq!(exit, Some(0));
    assert_eq!(ctx.get_reg(5), 0);
    assert_eq!(ctx.get_reg(6), 2);
}

#[test]
fn branch_not_taken_falls_through() {
    let mut program = vec![
        InstructionBuilder::new().addi(1, 0, 1).build(),
        InstructionBuilder::new().bne(1, 1, 8).build(), // equal: not taken
        InstructionBuilder::new().addi(5, 0, 7).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.run(16).unwrap();

    assert_eq!(ctx.get_reg(5), 7);
}

#[test]
fn jal_to_itself_never_returns() {
    let program = [InstructionBuilder::new().jal(0, 0).build()];
    let mut ctx = TestContext::new().load_program(0, &program);

    // Bounded by the test's cycle budget, not by the emulator.
    let exit = ctx.run(100).unwrap();

    assert_eq!(exit, None);
    assert_eq!(ctx.machine.pc, 0);
}

#[test]
fn jal_writes_the_return_address() {
    let mut program = vec![
        InstructionBuilder::new().jal(1, 8).build(), // to address 8
        InstructionBuilder::new().addi(5, 0, 1).build(), // skipped
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.run(16).unwrap();

    assert_eq!(ctx.get_reg(1), 4);
    assert_eq!(ctx.get_reg(5), 0);
}

#[test]
fn jalr_returns_through_a_register() {
    // x6 = 16; jump there, skipping the poison instruction at 8.
    let mut program = vec![
        InstructionBuilder::new().addi(6, 0, 16).build(),
        InstructionBuilder::new().jalr(1, 6, 0).build(),
        InstructionBuilder::new().addi(5, 0, 1).build(), // skipped
        InstructionBuilder::new().addi(7, 0, 9).build(), // skipped
    ];
    program.extend(exit_sequence()); // lands at 16

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(16).unwrap();

    assert_eq!(exit, Some(0));
    assert_eq!(ctx.get_reg(1), 8); // link: address after the jalr
    assert_eq!(ctx.get_reg(5), 0);
    assert_eq!(ctx.get_reg(7), 0);
}

#[test]
fn multiply_loop_computes_a_factorial() {
    // x5 = 5!, computed with a decrement loop.
    let mut program = vec![
        InstructionBuilder::new().addi(5, 0, 1).build(), // acc = 1
        InstructionBuilder::new().addi(6, 0, 5).build(), // n = 5
        InstructionBuilder::new().addi(7, 0, 1).build(), // constant one
        InstructionBuilder::new().mul(5, 5, 6).build(),  // acc *= n   (@12)
        InstructionBuilder::new().sub(6, 6, 7).build(),  // n -= 1
        InstructionBuilder::new().blt(7, 6, -8).build(), // while 1 < n
        InstructionBuilder::new().addi(REG_A0, 5, 0).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(64).unwrap();

    assert_eq!(exit, Some(120));
}

#[test]
fn bltu_treats_negative_registers_as_large() {
    let mut program = vec![
        InstructionBuilder::new().addi(1, 0, -1).build(), // 0xFFFF_FFFF unsigned
        InstructionBuilder::new().addi(2, 0, 1).build(),
        InstructionBuilder::new().bltu(2, 1, 8).build(), // 1 < 0xFFFF_FFFF: taken
        InstructionBuilder::new().addi(5, 0, 7).build(), // skipped
        InstructionBuilder::new().addi(6, 0, 9).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.run(16).unwrap();

    assert_eq!(ctx.get_reg(5), 0);
    assert_eq!(ctx.get_reg(6), 9);
}

#[test]
fn store_load_round_trip_through_guest_memory() {
    let mut program = vec![
        InstructionBuilder::new().addi(5, 0, 0x123).build(),
        InstructionBuilder::new().sw(0, 5, 64).build(),
        InstructionBuilder::new().lw(REG_A0, 0, 64).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(16).unwrap();

    assert_eq!(exit, Some(0x123));
}

#[test]
fn byte_store_sign_extends_on_reload() {
    let mut program = vec![
        InstructionBuilder::new().addi(5, 0, 0xFF).build(),
        InstructionBuilder::new().sb(0, 5, 64).build(),
        InstructionBuilder::new().lb(6, 0, 64).build(),
        InstructionBuilder::new().lbu(7, 0, 64).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.run(16).unwrap();

    assert_eq!(ctx.get_reg(6), -1);
    assert_eq!(ctx.get_reg(7), 255);
}

#[test]
fn lui_and_srai_compose() {
    let mut program = vec![
        InstructionBuilder::new().lui(5, 0x80000000u32 as i32).build(),
        InstructionBuilder::new().srai(6, 5, 31).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.run(16).unwrap();

    assert_eq!(ctx.get_reg(5), i32::MIN);
    assert_eq!(ctx.get_reg(6), -1);
}

#[test]
fn console_output_collects_guest_characters() {
    let mut program = vec![
        InstructionBuilder::new().addi(REG_A7, 0, 1).build(),
        InstructionBuilder::new().addi(REG_A0, 0, i32::from(b'H')).build(),
        InstructionBuilder::new().ecall().build(),
        InstructionBuilder::new().addi(REG_A0, 0, i32::from(b'i')).build(),
        InstructionBuilder::new().ecall().build(),
        InstructionBuilder::new().addi(REG_A0, 0, 0).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(32).unwrap();

    assert_eq!(exit, Some(0));
    assert_eq!(ctx.output(), b"Hi");
}

#[test]
fn console_input_reaches_a0() {
    let mut program = vec![
        InstructionBuilder::new().addi(REG_A7, 0, 2).build(),
        InstructionBuilder::new().ecall().build(),
    ];
    program.extend(exit_sequence()); // exits with a0 = the byte read

    let mut ctx = TestContext::with_input(b"A").load_program(0, &program);
    let exit = ctx.run(16).unwrap();

    assert_eq!(exit, Some(i32::from(b'A')));
}

#[test]
fn division_by_zero_halts_the_run() {
    let program = [
        InstructionBuilder::new().addi(1, 0, 9).build(),
        InstructionBuilder::new().div(5, 1, 0).build(),
    ];
    let mut ctx = TestContext::new().load_program(0, &program);

    let err = ctx.run(16).unwrap_err();
    assert!(matches!(err, EmulatorError::ArithmeticFault));
}

#[test]
fn all_zero_memory_faults_on_the_first_cycle() {
    let mut ctx = TestContext::new().load_program(0, &[]);
    let err = ctx.run(1).unwrap_err();
    assert!(matches!(err, EmulatorError::UnsupportedInstruction { .. }));
}

#[test]
fn first_cycle_establishes_the_stack_pointer() {
    let mut program = vec![InstructionBuilder::new().addi(REG_A0, 2, 0).build()];
    program.extend(exit_sequence()); // exit code = sp

    let mut ctx = TestContext::new().load_program(0, &program);
    let exit = ctx.run(16).unwrap();

    assert_eq!(exit, Some(1024 * 1024));
}

#[test]
fn stats_count_the_instruction_mix() {
    let mut program = vec![
        InstructionBuilder::new().addi(5, 0, 1).build(),
        InstructionBuilder::new().sw(0, 5, 64).build(),
        InstructionBuilder::new().lw(6, 0, 64).build(),
        InstructionBuilder::new().jal(0, 4).build(),
    ];
    program.extend(exit_sequence());

    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.run(16).unwrap();

    let stats = ctx.engine.stats();
    assert_eq!(stats.instructions_retired, 6);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_store, 1);
    assert_eq!(stats.inst_branch, 1);
    assert_eq!(stats.inst_system, 1);
    assert_eq!(stats.inst_alu, 2);
}
