//! Basic-block wiring for `if`/loops and short-circuit `&&`/`||`.
//!
//! Grounded on `codegen/control_flow.rs`'s branch/merge-block pattern,
//! generalized from Seq's `if`/`match` to BMinor's `if`/`while`/`do-while`/
//! `for`, and on the PHI-node merge every short-circuit boolean operator
//! needs (the reference `irgen.py` does not implement short-circuiting --
//! an expansion grounded on ordinary C-family `&&`/`||` semantics, per
//! spec §4.2/§4.7).

use crate::ast::{Block, Expr, Stmt};
use crate::ir::{IrType, Value};
use crate::types::BinOp;

use super::{CodeGenError, IrGen};

/// `a && b` only evaluates `b` if `a` is true; `a || b` only evaluates `b`
/// if `a` is false. Both merge through a PHI selecting between the
/// short-circuited value and `b`'s value.
pub(super) fn lower_short_circuit(
    gen: &mut IrGen,
    op: BinOp,
    l: &Expr,
    r: &Expr,
) -> Result<Value, CodeGenError> {
    let lv = gen.lower_expr(l)?;
    let entry_label = gen.builder().current_block_label();

    let rhs_label = gen.builder().new_block(match op {
        BinOp::And => "and.rhs",
        BinOp::Or => "or.rhs",
        _ => unreachable!("only And/Or short-circuit"),
    });
    let merge_label = gen.builder().new_block(match op {
        BinOp::And => "and.merge",
        BinOp::Or => "or.merge",
        _ => unreachable!("only And/Or short-circuit"),
    });

    match op {
        BinOp::And => gen.builder().cond_br(&lv, &rhs_label, &merge_label),
        BinOp::Or => gen.builder().cond_br(&lv, &merge_label, &rhs_label),
        _ => unreachable!(),
    }

    gen.builder().switch_to(&rhs_label);
    let rv = gen.lower_expr(r)?;
    let rhs_exit_label = gen.builder().current_block_label();
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&merge_label);
    }

    gen.builder().switch_to(&merge_label);
    Ok(gen.builder().phi(
        &IrType::I1,
        &[(lv, entry_label), (rv, rhs_exit_label)],
    ))
}

/// Lower a block in its own codegen scope (new alloca-owning variables shadow
/// outer ones by name, mirroring the checker's nested `Scope`).
pub(super) fn lower_block(gen: &mut IrGen, block: &Block) -> Result<(), CodeGenError> {
    gen.push_scope();
    for stmt in &block.stmts {
        gen.lower_stmt(stmt)?;
        if gen.builder().current_block_terminated() {
            break;
        }
    }
    gen.pop_scope();
    Ok(())
}

pub(super) fn lower_if(
    gen: &mut IrGen,
    cond: &Expr,
    then_block: &Block,
    else_block: Option<&Block>,
    _line: u32,
) -> Result<(), CodeGenError> {
    let cond_v = gen.lower_expr(cond)?;
    let then_label = gen.builder().new_block("if.then");
    let else_label = gen.builder().new_block("if.else");
    let merge_label = gen.builder().new_block("if.merge");

    gen.builder().cond_br(&cond_v, &then_label, &else_label);

    gen.builder().switch_to(&then_label);
    lower_block(gen, then_block)?;
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&merge_label);
    }

    gen.builder().switch_to(&else_label);
    if let Some(eb) = else_block {
        lower_block(gen, eb)?;
    }
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&merge_label);
    }

    gen.builder().switch_to(&merge_label);
    Ok(())
}

pub(super) fn lower_while(gen: &mut IrGen, cond: &Expr, body: &Block) -> Result<(), CodeGenError> {
    let cond_label = gen.builder().new_block("while.cond");
    let body_label = gen.builder().new_block("while.body");
    let end_label = gen.builder().new_block("while.end");

    gen.builder().br(&cond_label);

    gen.builder().switch_to(&cond_label);
    let cond_v = gen.lower_expr(cond)?;
    gen.builder().cond_br(&cond_v, &body_label, &end_label);

    gen.builder().switch_to(&body_label);
    lower_block(gen, body)?;
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&cond_label);
    }

    gen.builder().switch_to(&end_label);
    Ok(())
}

pub(super) fn lower_do_while(gen: &mut IrGen, body: &Block, cond: &Expr) -> Result<(), CodeGenError> {
    let body_label = gen.builder().new_block("do.body");
    let cond_label = gen.builder().new_block("do.cond");
    let end_label = gen.builder().new_block("do.end");

    gen.builder().br(&body_label);

    gen.builder().switch_to(&body_label);
    lower_block(gen, body)?;
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&cond_label);
    }

    gen.builder().switch_to(&cond_label);
    let cond_v = gen.lower_expr(cond)?;
    gen.builder().cond_br(&cond_v, &body_label, &end_label);

    gen.builder().switch_to(&end_label);
    Ok(())
}

pub(super) fn lower_for(
    gen: &mut IrGen,
    init: Option<&Stmt>,
    cond: Option<&Expr>,
    update: Option<&Stmt>,
    body: &Block,
) -> Result<(), CodeGenError> {
    gen.push_scope();
    if let Some(init) = init {
        gen.lower_stmt(init)?;
    }

    let cond_label = gen.builder().new_block("for.cond");
    let body_label = gen.builder().new_block("for.body");
    let update_label = gen.builder().new_block("for.update");
    let end_label = gen.builder().new_block("for.end");

    gen.builder().br(&cond_label);

    gen.builder().switch_to(&cond_label);
    match cond {
        Some(cond) => {
            let cond_v = gen.lower_expr(cond)?;
            gen.builder().cond_br(&cond_v, &body_label, &end_label);
        }
        None => gen.builder().br(&body_label),
    }

    gen.builder().switch_to(&body_label);
    lower_block(gen, body)?;
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&update_label);
    }

    gen.builder().switch_to(&update_label);
    if let Some(update) = update {
        gen.lower_stmt(update)?;
    }
    if !gen.builder().current_block_terminated() {
        gen.builder().br(&cond_label);
    }

    gen.builder().switch_to(&end_label);
    gen.pop_scope();
    Ok(())
}
