use std::cell::RefCell;
use std::process::ExitCode;
use std::ptr::NonNull;
use std::rc::Rc;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use relay_core::callback::WeakMemberCallback;
use relay_core::{
    Callback, CallbackKind, Delegate, Event, make_free, make_free_bound, make_lambda,
    make_lambda_bound, make_member, make_member_bound, make_weak_member,
};

/// Builds one callback of every kind, fans them out through an Event and
/// then drives a Delegate.
#[derive(Debug, Parser)]
#[command(name = "relay", version)]
struct Cli {
    /// tracing filter directive (RUST_LOG takes precedence when set)
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Emit log lines as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print a JSON report of the run to stdout
    #[arg(long)]
    report: bool,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    event_kinds: Vec<CallbackKind>,
    event_len_after_unsubscribe: usize,
    delegate_kind: Option<CallbackKind>,
    weak_member_alive: bool,
}

fn free_function() {
    println!("FreeFunction");
}

fn free_function_with_params(param: i32) {
    println!("FreeFunctionWithParams {param}");
}

struct SomeClass {
    name: &'static str,
}

impl SomeClass {
    fn member_function(&mut self) {
        println!("MemberFunction ({})", self.name);
    }

    fn member_function_with_params(&mut self, param: i32) {
        println!("MemberFunctionWithParams {param} ({})", self.name);
    }
}

/// A functor: state plus a call method, wrapped in a closure for `make_lambda`.
#[derive(Clone)]
struct Functor {
    label: &'static str,
}

impl Functor {
    fn call(&self) {
        println!("{}", self.label);
    }

    fn call_with(&self, param: i32) {
        println!("{} {param}", self.label);
    }
}

fn init_tracing(cli: &Cli) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_filter))
        .map_err(|e| format!("invalid log filter {:?}: {e}", cli.log_filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if cli.json_logs {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    installed.map_err(|e| format!("failed to install tracing subscriber: {e}"))
}

fn run(cli: &Cli) -> Result<(), String> {
    let mut obj = SomeClass { name: "obj" };
    let shared = Rc::new(RefCell::new(SomeClass { name: "shared" }));
    let functor = Functor { label: "Functor" };
    let functor_with_params = Functor {
        label: "FunctorWithParams",
    };

    // (A) Event にすべての種類の Callback を購読させる
    let mut event: Event<fn()> = Event::new();
    let obj_ptr = NonNull::from(&mut obj);
    event += make_free(free_function as fn());
    event += make_free_bound(free_function_with_params as fn(i32), (0,));
    // SAFETY: `obj` lives until the end of `run`, after the last invocation,
    // and is not touched directly while `event` is alive.
    unsafe {
        event += make_member(SomeClass::member_function as fn(&mut SomeClass), obj_ptr);
        event += make_member_bound(
            SomeClass::member_function_with_params as fn(&mut SomeClass, i32),
            obj_ptr,
            (1,),
        );
    }
    event += make_weak_member(SomeClass::member_function as fn(&mut SomeClass), &shared);
    event += make_lambda(move || functor.call());
    event += make_lambda_bound(move |param: i32| functor_with_params.call_with(param), (2,));
    event += make_lambda(|| println!("Lambda"));
    event += make_lambda_bound(|param: i32| println!("LambdaWithParams {param}"), (3,));

    // 同じものをもう一度購読しても増えない
    event += make_free(free_function as fn());
    tracing::info!(subscribers = event.len(), "event ready");

    // (B) 全件呼び出し（購読順）
    event.invoke(());
    let event_kinds = event.kinds();

    // (C) 購読解除してからもう一度
    event -= make_free(free_function as fn());
    event -= make_free_bound(free_function_with_params as fn(i32), (0,));
    tracing::info!(subscribers = event.len(), "after unsubscribe");
    event.invoke(());
    let event_len_after_unsubscribe = event.len();
    drop(event);

    // (D) Delegate
    let mut delegate: Delegate<fn()> = Delegate::new();
    delegate.invoke(());
    delegate.set(make_free(free_function as fn()));
    delegate.invoke(());
    let delegate_kind = delegate.callback().map(|cb| cb.kind());

    // (E) weak member は instance を drop した後は何もしない
    let weak = WeakMemberCallback::new(SomeClass::member_function as fn(&mut SomeClass), &shared);
    drop(shared);
    weak.invoke(());
    let weak_member_alive = weak.is_alive();

    if cli.report {
        let report = DemoReport {
            event_kinds,
            event_len_after_unsubscribe,
            delegate_kind,
            weak_member_alive,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{json}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
