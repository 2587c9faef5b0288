//! SchoolHub - 学校管理平台后端服务
//!
//! 基于 Actix Web 构建，覆盖测验批改、成绩档案、考勤、教学资料与 AI 辅助功能。
//!
//! # 架构
//! - `ai`: AI 生成服务适配层（Gemini / 禁用）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `extraction`: 上传文件文本提取
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `policy`: 按角色限定数据可见范围
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod ai;
pub mod config;
pub mod entity;
pub mod errors;
pub mod extraction;
pub mod middlewares;
pub mod models;
pub mod policy;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
