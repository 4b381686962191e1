use crate::{
    director::{
        chunks::handler::HandlerDef,
        lingo::{constants::get_opcode_name, opcode::OpCode},
    },
    player::{
        bytecode::{
            arithmetics::ArithmeticsBytecodeHandler, flow_control::FlowControlBytecodeHandler,
            stack::StackBytecodeHandler,
        },
        reserve_player_mut,
        scope::ScopeRef,
        script::Script,
        HandlerExecutionResult, ScriptError,
    },
};

use super::{
    compare::CompareBytecodeHandler, get_set::GetSetBytecodeHandler, string::StringBytecodeHandler,
    sprite_compare::SpriteCompareBytecodeHandler,
};

#[derive(Clone)]
pub struct BytecodeHandlerContext {
    pub scope_ref: ScopeRef,
    pub handler_def_ptr: *const HandlerDef,
    pub script_ptr: *const Script,
}

pub struct StaticBytecodeHandlerManager {}
impl StaticBytecodeHandlerManager {
    #[inline(always)]
    pub fn call_handler(
        opcode: OpCode,
        ctx: &BytecodeHandlerContext,
    ) -> Result<HandlerExecutionResult, ScriptError> {
        match opcode {
            OpCode::Add => ArithmeticsBytecodeHandler::add(ctx),
            OpCode::PushInt8 => StackBytecodeHandler::push_int(ctx),
            OpCode::PushInt16 => StackBytecodeHandler::push_int(ctx),
            OpCode::PushInt32 => StackBytecodeHandler::push_int(ctx),
            OpCode::PushArgList => StackBytecodeHandler::push_arglist(ctx),
            OpCode::PushArgListNoRet => StackBytecodeHandler::push_arglist_no_ret(ctx),
            OpCode::PushSymb => StackBytecodeHandler::push_symb(ctx),
            OpCode::Swap => StackBytecodeHandler::swap(ctx),
            OpCode::GetProp => GetSetBytecodeHandler::get_prop(ctx),
            OpCode::GetObjProp => GetSetBytecodeHandler::get_obj_prop(ctx),
            OpCode::GetMovieProp => GetSetBytecodeHandler::get_movie_prop(ctx),
            OpCode::Set => GetSetBytecodeHandler::set(ctx),
            OpCode::Ret => FlowControlBytecodeHandler::ret(ctx),
            OpCode::JmpIfZ => FlowControlBytecodeHandler::jmp_if_zero(ctx),
            OpCode::Jmp => FlowControlBytecodeHandler::jmp(ctx),
            OpCode::GetGlobal => GetSetBytecodeHandler::get_global(ctx),
            OpCode::SetGlobal => GetSetBytecodeHandler::set_global(ctx),
            OpCode::PushCons => StackBytecodeHandler::push_cons(ctx),
            OpCode::PushZero => StackBytecodeHandler::push_zero(ctx),
            OpCode::GetField => GetSetBytecodeHandler::get_field(ctx),
            OpCode::GetLocal => GetSetBytecodeHandler::get_local(ctx),
            OpCode::SetLocal => GetSetBytecodeHandler::set_local(ctx),
            OpCode::GetParam => GetSetBytecodeHandler::get_param(ctx),
            OpCode::SetMovieProp => GetSetBytecodeHandler::set_movie_prop(ctx),
            OpCode::PushPropList => StackBytecodeHandler::push_prop_list(ctx),
            OpCode::Gt => CompareBytecodeHandler::gt(ctx),
            OpCode::Lt => CompareBytecodeHandler::lt(ctx),
            OpCode::GtEq => CompareBytecodeHandler::gt_eq(ctx),
            OpCode::LtEq => CompareBytecodeHandler::lt_eq(ctx),
            OpCode::Sub => ArithmeticsBytecodeHandler::sub(ctx),
            OpCode::EndRepeat => FlowControlBytecodeHandler::end_repeat(ctx),
            OpCode::SetProp => GetSetBytecodeHandler::set_prop(ctx),
            OpCode::PushList => StackBytecodeHandler::push_list(ctx),
            OpCode::Not => CompareBytecodeHandler::not(ctx),
            OpCode::NtEq => CompareBytecodeHandler::nt_eq(ctx),
            OpCode::TheBuiltin => GetSetBytecodeHandler::the_built_in(ctx),
            OpCode::Peek => StackBytecodeHandler::peek(ctx),
            OpCode::Pop => StackBytecodeHandler::pop(ctx),
            OpCode::And => CompareBytecodeHandler::and(ctx),
            OpCode::Eq => CompareBytecodeHandler::eq(ctx),
            OpCode::SetParam => GetSetBytecodeHandler::set_param(ctx),
            OpCode::GetChainedProp => GetSetBytecodeHandler::get_chained_prop(ctx),
            OpCode::ContainsStr => StringBytecodeHandler::contains_str(ctx),
            OpCode::Contains0Str => StringBytecodeHandler::contains_0str(ctx),
            OpCode::JoinPadStr => StringBytecodeHandler::join_pad_str(ctx),
            OpCode::JoinStr => StringBytecodeHandler::join_str(ctx),
            OpCode::Get => GetSetBytecodeHandler::get(ctx),
            OpCode::Mod => ArithmeticsBytecodeHandler::mod_handler(ctx),
            OpCode::GetChunk => StringBytecodeHandler::get_chunk(ctx),
            OpCode::Put => StringBytecodeHandler::put(ctx),
            OpCode::Or => CompareBytecodeHandler::or(ctx),
            OpCode::Inv => ArithmeticsBytecodeHandler::inv(ctx),
            OpCode::Div => ArithmeticsBytecodeHandler::div(ctx),
            OpCode::PushFloat32 => StackBytecodeHandler::push_f32(ctx),
            OpCode::Mul => ArithmeticsBytecodeHandler::mul(ctx),
            OpCode::PushChunkVarRef => StackBytecodeHandler::push_chunk_var_ref(ctx),
            OpCode::DeleteChunk => StringBytecodeHandler::delete_chunk(ctx),
            OpCode::GetTopLevelProp => GetSetBytecodeHandler::get_top_level_prop(ctx),
            OpCode::PutChunk => StringBytecodeHandler::put_chunk(ctx),
            OpCode::OntoSpr => SpriteCompareBytecodeHandler::onto_sprite(ctx),
            OpCode::IntoSpr => SpriteCompareBytecodeHandler::into_sprite(ctx),
            OpCode::CallJavaScript => FlowControlBytecodeHandler::call_javascript(ctx),
            OpCode::NewObj => StackBytecodeHandler::new_obj(ctx),
            OpCode::ExtCall => FlowControlBytecodeHandler::ext_call(ctx),
            OpCode::ObjCall => FlowControlBytecodeHandler::obj_call(ctx),
            OpCode::LocalCall => FlowControlBytecodeHandler::local_call(ctx),
            OpCode::SetObjProp => GetSetBytecodeHandler::set_obj_prop(ctx),
            _ => {
                let prim = num::ToPrimitive::to_u16(&opcode).unwrap();
                let name = get_opcode_name(opcode);
                let fmt = format!("No handler for opcode {name} ({prim:#04x})");
                Err(ScriptError::new(fmt))
            }
        }
    }
}

/// Executes the single bytecode instruction at the current scope's program
/// counter, reporting it to the attached `DebugTap` first. A tap that
/// returns `false` from `on_instruction` aborts the handler invocation
/// rather than suspending it — the VM has no reified continuation to resume
/// from later, so a host that wants a real breakpoint loop polls via
/// repeated `Engine::tick` calls and inspects `frame_snapshot` in between.
#[inline(always)]
pub fn player_execute_bytecode(
    ctx: &BytecodeHandlerContext,
) -> Result<HandlerExecutionResult, ScriptError> {
    let (opcode, handler_name, bytecode_index, should_continue) = {
        let handler = unsafe { &*ctx.handler_def_ptr };
        let script = unsafe { &*ctx.script_ptr };
        reserve_player_mut(|player| {
            let scope = player.scopes.get(ctx.scope_ref).unwrap();
            let bytecode_index = scope.bytecode_index;
            let bytecode = &handler.bytecode_array[bytecode_index];
            let handler_name = script
                .handler_names
                .get(handler.name_id as usize)
                .cloned()
                .unwrap_or_default();
            let should_continue = player
                .debug_tap
                .on_instruction(&handler_name, bytecode_index);
            (bytecode.opcode, handler_name, bytecode_index, should_continue)
        })
    };

    if !should_continue {
        return Err(ScriptError::new(format!(
            "Execution paused by debug tap in {} at {}",
            handler_name, bytecode_index
        )));
    }

    StaticBytecodeHandlerManager::call_handler(opcode, ctx)
}

#[allow(dead_code)]
pub fn get_ctx_handler_name(ctx: &BytecodeHandlerContext) -> &str {
    let handler = unsafe { &*ctx.handler_def_ptr };
    let script = unsafe { &*ctx.script_ptr };
    script
        .handler_names
        .get(handler.name_id as usize)
        .map(|s| s.as_str())
        .unwrap_or("")
}
