use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use rill_core::expr::Expr;
use rill_core::interp::Interp;
use rill_core::op::BinOp;
use rill_core::scope::Scope;
use rill_core::stmt::{AssignTarget, Program, Stmt};
use rill_core::val::Val;

fn lit(i: i64) -> Expr {
    Expr::Lit(Val::Int(i))
}

fn var(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

fn bin(l: Expr, op: BinOp, r: Expr) -> Expr {
    Expr::Bin(Box::new(l), op, Box::new(r))
}

fn declare(name: &str, init: Expr) -> Stmt {
    Stmt::Var {
        name: name.to_string(),
        init: Some(Box::new(init)),
    }
}

fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        target: AssignTarget::Var(name.to_string()),
        value: Box::new(value),
    }
}

fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(Box::new(callee), args)
}

// var s = 0; for (var i = 1; i <= 1000; i = i + 1) s = s + i;
fn loop_sum_program() -> Program {
    Program::new(vec![
        declare("s", lit(0)),
        Stmt::For {
            init: Some(Box::new(declare("i", lit(1)))),
            condition: Some(Box::new(bin(var("i"), BinOp::Le, lit(1000)))),
            update: Some(Box::new(assign("i", bin(var("i"), BinOp::Add, lit(1))))),
            body: Box::new(Stmt::Block(vec![assign(
                "s",
                bin(var("s"), BinOp::Add, var("i")),
            )])),
        },
    ])
}

// var add = (a, b) => a + b; then 1000 calls in a loop
fn closure_call_program() -> Program {
    let add = Expr::Fn {
        params: vec!["a".to_string(), "b".to_string()],
        body: Rc::new(Stmt::Block(vec![Stmt::Return {
            value: Some(Box::new(bin(var("a"), BinOp::Add, var("b")))),
        }])),
        name: Some("add".to_string()),
    };
    Program::new(vec![
        declare("add", add),
        declare("acc", lit(0)),
        Stmt::For {
            init: Some(Box::new(declare("i", lit(0)))),
            condition: Some(Box::new(bin(var("i"), BinOp::Lt, lit(1000)))),
            update: Some(Box::new(assign("i", bin(var("i"), BinOp::Add, lit(1))))),
            body: Box::new(Stmt::Block(vec![assign(
                "acc",
                call(var("add"), vec![var("acc"), var("i")]),
            )])),
        },
    ])
}

// countdown(n) recursing to the base case
fn recursion_program(depth: i64) -> Program {
    let body = Stmt::Block(vec![
        Stmt::If {
            condition: Box::new(bin(var("n"), BinOp::Le, lit(0))),
            then_stmt: Box::new(Stmt::Return {
                value: Some(Box::new(lit(0))),
            }),
            else_stmt: None,
        },
        Stmt::Return {
            value: Some(Box::new(call(
                var("countdown"),
                vec![bin(var("n"), BinOp::Sub, lit(1))],
            ))),
        },
    ]);
    Program::new(vec![
        declare(
            "countdown",
            Expr::Fn {
                params: vec!["n".to_string()],
                body: Rc::new(body),
                name: Some("countdown".to_string()),
            },
        ),
        declare("r", call(var("countdown"), vec![lit(depth)])),
    ])
}

fn bench_eval(c: &mut Criterion) {
    let loop_sum = loop_sum_program();
    c.bench_function("loop_sum_1000", |b| {
        b.iter(|| {
            let mut interp = Interp::new();
            let scope = Scope::root();
            interp.execute(black_box(&loop_sum), &scope).unwrap();
            black_box(scope.get("s").unwrap());
        })
    });

    let closure_calls = closure_call_program();
    c.bench_function("closure_calls_1000", |b| {
        b.iter(|| {
            let mut interp = Interp::new();
            let scope = Scope::root();
            interp.execute(black_box(&closure_calls), &scope).unwrap();
            black_box(scope.get("acc").unwrap());
        })
    });

    let recursion = recursion_program(1000);
    c.bench_function("recursion_1000", |b| {
        b.iter(|| {
            let mut interp = Interp::new();
            let scope = Scope::root();
            interp.execute(black_box(&recursion), &scope).unwrap();
        })
    });
}

criterion_group!(benches, bench_eval);
criterion_main!(benches);
