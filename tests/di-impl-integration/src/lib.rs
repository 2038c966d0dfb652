//! 集中集成测试工程：依赖注入容器
